//! Static reference data: customer classes, DR technologies, and rate plans.
//!
//! Everything here is immutable and process-wide; callers only ever hold
//! `&'static` references into these tables.

/// Customer classes and their hourly load profiles.
pub mod customer;
/// Rate plans and their pricing policies.
pub mod rate_plan;
/// Enrollable demand response technologies.
pub mod technology;

pub use customer::CustomerClass;
pub use rate_plan::{PriceBand, PricingPolicy, RatePlan};
pub use technology::{ComfortImpact, Technology};

use crate::error::ValidationError;

/// All customer classes, in display order.
pub fn customer_classes() -> &'static [CustomerClass] {
    &customer::CUSTOMER_CLASSES
}

/// All technologies across every class.
pub fn all_technologies() -> &'static [Technology] {
    &technology::TECHNOLOGIES
}

/// All rate plans, in display order.
pub fn rate_plans() -> &'static [RatePlan] {
    &rate_plan::RATE_PLANS
}

pub fn customer_class(id: &str) -> Option<&'static CustomerClass> {
    customer_classes().iter().find(|c| c.id == id)
}

pub fn technology(id: &str) -> Option<&'static Technology> {
    all_technologies().iter().find(|t| t.id == id)
}

pub fn rate_plan(id: &str) -> Option<&'static RatePlan> {
    rate_plans().iter().find(|p| p.id == id)
}

/// Returns the technologies eligible for `class_id`, in the class's order.
///
/// # Errors
///
/// Returns [`ValidationError::UnknownCustomerClass`] if no class has that id.
pub fn technologies_for(class_id: &str) -> Result<Vec<&'static Technology>, ValidationError> {
    let class = customer_class(class_id)
        .ok_or_else(|| ValidationError::UnknownCustomerClass(class_id.to_string()))?;
    Ok(class.technologies.iter().filter_map(|id| technology(id)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_eligible_id_resolves() {
        for class in customer_classes() {
            for id in class.technologies {
                assert!(technology(id).is_some(), "{} lists unknown {id}", class.id);
            }
        }
    }

    #[test]
    fn technologies_for_filters_to_class() {
        let techs = technologies_for("residential").expect("residential exists");
        let ids: Vec<&str> = techs.iter().map(|t| t.id).collect();
        assert_eq!(
            ids,
            vec!["smart_thermostat", "ev_charging", "water_heater", "pool_pump"]
        );
    }

    #[test]
    fn technologies_for_unknown_class_is_an_error() {
        assert_eq!(
            technologies_for("utility"),
            Err(ValidationError::UnknownCustomerClass("utility".to_string()))
        );
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(rate_plan("cpp").map(|p| p.name), Some("Critical Peak Pricing"));
        assert!(rate_plan("flat").is_none());
        assert_eq!(customer_class("industrial").map(|c| c.max_curtail_pct), Some(20.0));
        assert_eq!(
            technology("process_control").map(|t| t.comfort_impact),
            Some(ComfortImpact::High)
        );
    }

    #[test]
    fn catalog_sizes() {
        assert_eq!(customer_classes().len(), 4);
        assert_eq!(all_technologies().len(), 16);
        assert_eq!(rate_plans().len(), 3);
    }

    #[test]
    fn only_rtp_is_real_time() {
        let real_time: Vec<&str> = rate_plans()
            .iter()
            .filter(|p| p.is_real_time())
            .map(|p| p.id)
            .collect();
        assert_eq!(real_time, vec!["rtp"]);
    }
}
