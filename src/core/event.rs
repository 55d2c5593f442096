use super::types::{RunId, StateId, Tick};
use serde::{Deserialize, Serialize};

/// One machine's outcome for one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub tick: Tick,
    pub machine: String,
    /// State after any transition taken this tick
    pub state: StateId,
    /// Parts the machine tried to produce; 0 when blocked or starved last tick
    pub requested_speed: f64,
    /// Parts actually placed in the output buffer
    pub actual_speed: f64,
    /// Cumulative parts produced so far in the run
    pub count: f64,
    pub tailback: bool,
    pub lack: bool,
    pub run: RunId,
}
