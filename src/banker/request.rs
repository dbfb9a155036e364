/*!
 * Resource Requests
 * Copy-on-attempt request handling and a stateful banker
 */

use super::safety::SafetyReport;
use super::state::{BankerResult, BankersState};
use crate::core::errors::BankerError;
use crate::core::types::Units;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Result of a request that passed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RequestDecision {
    pub granted: bool,
    /// Post-request state when granted, an untouched copy of the input
    /// otherwise
    pub state: BankersState,
    /// Safe sequence when granted, partial sequence otherwise
    pub sequence: Vec<usize>,
}

impl RequestDecision {
    /// Surface a denial as `UnsafeState`
    pub fn into_result(self) -> BankerResult<(BankersState, Vec<usize>)> {
        if self.granted {
            Ok((self.state, self.sequence))
        } else {
            Err(BankerError::UnsafeState {
                partial_sequence: self.sequence,
            })
        }
    }
}

/// Validate a request against need then availability; nothing is mutated
fn validate_request(index: usize, request: &[Units], state: &BankersState) -> BankerResult<()> {
    state.check_index(index)?;
    if request.len() != state.resources() {
        return Err(BankerError::DimensionMismatch(format!(
            "request has {} columns, expected {}",
            request.len(),
            state.resources()
        )));
    }

    let need = &state.need()[index];
    if let Some((resource, (&requested, &need))) = request.iter().zip(need).enumerate().find(|(_, (r, n))| r > n) {
        return Err(BankerError::ExceedsNeed {
            process: index,
            resource,
            requested,
            need,
        });
    }

    if let Some((resource, (&requested, &available))) = request
        .iter()
        .zip(state.available())
        .enumerate()
        .find(|(_, (r, a))| r > a)
    {
        return Err(BankerError::ExceedsAvailable {
            process: index,
            resource,
            requested,
            available,
        });
    }
    Ok(())
}

/// Decide a request for process `index`
///
/// The request is applied to a copy of `state`; the copy is returned only
/// when it passes the safety check, so a denial can never leave a partial
/// mutation behind. `ExceedsNeed` and `ExceedsAvailable` are returned as
/// errors before any copy is made.
pub fn request_resources(index: usize, request: &[Units], state: &BankersState) -> BankerResult<RequestDecision> {
    validate_request(index, request, state)?;

    let mut tentative = state.clone();
    tentative.apply_request(index, request);
    let SafetyReport { safe, sequence, .. } = tentative.check_safety();

    if safe {
        info!(process = index, request = ?request, sequence = ?sequence, "request granted");
        Ok(RequestDecision {
            granted: true,
            state: tentative,
            sequence,
        })
    } else {
        warn!(process = index, request = ?request, "request denied: unsafe state");
        Ok(RequestDecision {
            granted: false,
            state: state.clone(),
            sequence,
        })
    }
}

/// Owns one Banker's state and commits granted requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banker {
    state: BankersState,
}

impl Banker {
    pub fn new(state: BankersState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &BankersState {
        &self.state
    }

    pub fn check_safety(&self) -> SafetyReport {
        self.state.check_safety()
    }

    /// Request resources; on success the tentative state is swapped in and
    /// the safe sequence returned
    pub fn request(&mut self, index: usize, request: &[Units]) -> BankerResult<Vec<usize>> {
        let (state, sequence) = request_resources(index, request, &self.state)?.into_result()?;
        self.state = state;
        Ok(sequence)
    }

    pub fn into_state(self) -> BankersState {
        self.state
    }
}
