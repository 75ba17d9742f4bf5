/// Config for a container
/// ## Fields
/// - `detect_cycles`:
///   If `true`, a constructor checks the graph reachable from its injection type for cycles
///   before its first realization, and fails with the cycle instead of waiting on itself forever.
///
///   Disable only for graphs already checked with [`Container::validate`](crate::Container::validate).
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub detect_cycles: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { detect_cycles: true }
    }
}
