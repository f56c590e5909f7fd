//! Trace configuration.

use crate::stepping::Stepping;
use gridwalk_traversal::QueueDiscipline;

/// How a [`NetworkTrace`](crate::NetworkTrace) walks the network.
///
/// Defaults to equipment stepping, depth-first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraceConfig {
    /// Successor enumeration strategy.
    pub stepping: Stepping,
    /// Queue order.
    pub discipline: QueueDiscipline,
}

impl TraceConfig {
    /// Equipment stepping, depth-first.
    pub fn equipment() -> Self {
        Self {
            stepping: Stepping::Equipment,
            discipline: QueueDiscipline::DepthFirst,
        }
    }

    /// Terminal stepping, depth-first.
    pub fn terminal() -> Self {
        Self {
            stepping: Stepping::Terminal,
            discipline: QueueDiscipline::DepthFirst,
        }
    }

    /// The same config with a breadth-first queue.
    pub fn breadth_first(mut self) -> Self {
        self.discipline = QueueDiscipline::BreadthFirst;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_depth_first_equipment() {
        assert_eq!(TraceConfig::default(), TraceConfig::equipment());
        assert_eq!(TraceConfig::default().discipline, QueueDiscipline::DepthFirst);
    }

    #[test]
    fn breadth_first_keeps_stepping() {
        let config = TraceConfig::terminal().breadth_first();
        assert_eq!(config.stepping, Stepping::Terminal);
        assert_eq!(config.discipline, QueueDiscipline::BreadthFirst);
    }
}
