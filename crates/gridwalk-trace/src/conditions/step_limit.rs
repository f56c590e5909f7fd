use super::{ContextEntry, NetworkTraceCondition};
use crate::step::NetworkTraceStep;
use gridwalk_core::EquipmentId;
use gridwalk_network::{EquipmentType, Network};
use gridwalk_traversal::{ContextComputer, StepContext};
use std::fmt;

/// Selects the equipment an [`EquipmentStepLimitCondition`] counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EquipmentFilter {
    /// Equipment of exactly this type.
    Type(EquipmentType),
    /// Any switching device, as reported by [`EquipmentType::is_switch`].
    AnySwitch,
}

impl EquipmentFilter {
    /// Whether `kind` passes the filter.
    pub fn matches(self, kind: EquipmentType) -> bool {
        match self {
            Self::Type(t) => t == kind,
            Self::AnySwitch => kind.is_switch(),
        }
    }

    fn matches_equipment(self, network: &Network, equipment: EquipmentId) -> bool {
        network
            .equipment(equipment)
            .is_ok_and(|e| self.matches(e.kind()))
    }
}

impl From<EquipmentType> for EquipmentFilter {
    fn from(kind: EquipmentType) -> Self {
        Self::Type(kind)
    }
}

impl fmt::Display for EquipmentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(t) => write!(f, "{t}"),
            Self::AnySwitch => f.write_str("switch"),
        }
    }
}

/// Stops a trace after a number of equipment steps.
///
/// Unfiltered, the limit applies to
/// [`n_equipment_steps`](NetworkTraceStep::n_equipment_steps). With a
/// filter, a running count of crossings into matching equipment is kept in
/// step context under [`context_key`](Self::context_key).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EquipmentStepLimitCondition {
    limit: u32,
    filter: Option<EquipmentFilter>,
    key: String,
}

impl EquipmentStepLimitCondition {
    /// Stop once `limit` equipment steps (matching `filter`, if any) have
    /// been taken.
    pub fn new(limit: u32, filter: Option<EquipmentFilter>) -> Self {
        let key = match filter {
            Some(filter) => format!("gridwalk:equipment_steps:{filter}"),
            None => "gridwalk:equipment_steps".to_string(),
        };
        Self { limit, filter, key }
    }

    /// The step limit.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// The equipment counted, if filtered.
    pub fn filter(&self) -> Option<EquipmentFilter> {
        self.filter
    }

    /// Context key of the filtered running count.
    pub fn context_key(&self) -> &str {
        &self.key
    }

    /// Steps counted so far at `step`.
    pub fn count<D>(&self, step: &NetworkTraceStep<D>, context: &StepContext) -> u32 {
        match self.filter {
            None => step.n_equipment_steps(),
            Some(_) => context.data::<u32>(&self.key).copied().unwrap_or(0),
        }
    }
}

impl<D> NetworkTraceCondition<D> for EquipmentStepLimitCondition {
    fn should_stop(&self, _: &Network, step: &NetworkTraceStep<D>, context: &StepContext) -> bool {
        self.count(step, context) >= self.limit
    }

    fn context_entry<'n>(&self, network: &'n Network) -> Option<ContextEntry<'n, D>>
    where
        D: 'n,
    {
        let filter = self.filter?;
        let computer = ContextComputer::new(
            |_: &NetworkTraceStep<D>| 0u32,
            move |count: &u32, _: &NetworkTraceStep<D>, next: &NetworkTraceStep<D>| {
                if !next.stepped_internally() && filter.matches_equipment(network, next.to_equipment()) {
                    count + 1
                } else {
                    *count
                }
            },
        );
        Some(ContextEntry {
            key: self.key.clone(),
            computer: Box::new(computer),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_matches_type_or_any_switch() {
        assert!(EquipmentFilter::AnySwitch.matches(EquipmentType::Fuse));
        assert!(!EquipmentFilter::AnySwitch.matches(EquipmentType::AcLineSegment));
        let lines = EquipmentFilter::from(EquipmentType::AcLineSegment);
        assert!(lines.matches(EquipmentType::AcLineSegment));
        assert!(!lines.matches(EquipmentType::Breaker));
    }

    #[test]
    fn context_key_depends_on_filter() {
        let any = EquipmentStepLimitCondition::new(3, Some(EquipmentFilter::AnySwitch));
        let typed = EquipmentStepLimitCondition::new(3, Some(EquipmentType::Breaker.into()));
        assert_ne!(any.context_key(), typed.context_key());
        assert!(typed.context_key().ends_with(&EquipmentType::Breaker.to_string()));
    }

    #[test]
    fn unfiltered_limit_needs_no_context() {
        let network = Network::new();
        let limit = EquipmentStepLimitCondition::new(1, None);
        assert!(NetworkTraceCondition::<()>::context_entry(&limit, &network).is_none());
    }
}
