/*!
 * Banker's State
 * Validated allocation, max and need matrices
 */

use crate::core::errors::BankerError;
use crate::core::types::Units;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for Banker's operations
pub type BankerResult<T> = Result<T, BankerError>;

/// Matrices for P processes over R resources
///
/// `need[i][j] == max[i][j] - allocation[i][j]` holds for every cell; a
/// state with negative need can not be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "RawMatrices")]
pub struct BankersState {
    allocation: Vec<Vec<Units>>,
    max: Vec<Vec<Units>>,
    need: Vec<Vec<Units>>,
    available: Vec<Units>,
}

// Wire shape; need is always recomputed
#[derive(Deserialize)]
struct RawMatrices {
    allocation: Vec<Vec<Units>>,
    max: Vec<Vec<Units>>,
    available: Vec<Units>,
}

impl TryFrom<RawMatrices> for BankersState {
    type Error = BankerError;

    fn try_from(raw: RawMatrices) -> Result<Self, Self::Error> {
        Self::new(raw.allocation, raw.max, raw.available)
    }
}

impl BankersState {
    pub fn new(allocation: Vec<Vec<Units>>, max: Vec<Vec<Units>>, available: Vec<Units>) -> BankerResult<Self> {
        let need = compute_need(&allocation, &max, available.len())?;
        check_totals(&allocation, &available)?;
        Ok(Self {
            allocation,
            max,
            need,
            available,
        })
    }

    #[inline]
    pub fn processes(&self) -> usize {
        self.allocation.len()
    }

    #[inline]
    pub fn resources(&self) -> usize {
        self.available.len()
    }

    pub fn allocation(&self) -> &[Vec<Units>] {
        &self.allocation
    }

    pub fn max(&self) -> &[Vec<Units>] {
        &self.max
    }

    pub fn need(&self) -> &[Vec<Units>] {
        &self.need
    }

    pub fn available(&self) -> &[Units] {
        &self.available
    }

    pub(crate) fn check_index(&self, index: usize) -> BankerResult<()> {
        if index >= self.processes() {
            return Err(BankerError::ProcessOutOfRange {
                index,
                processes: self.processes(),
            });
        }
        Ok(())
    }

    /// Move `request` from available into process `index`'s allocation.
    /// Callers check bounds first.
    pub(crate) fn apply_request(&mut self, index: usize, request: &[Units]) {
        for (j, &units) in request.iter().enumerate() {
            self.available[j] -= units;
            self.allocation[index][j] += units;
            self.need[index][j] -= units;
        }
    }
}

// Work in the safety check never exceeds available plus allocated, so a
// total that fits in `Units` rules out overflow there
fn check_totals(allocation: &[Vec<Units>], available: &[Units]) -> BankerResult<()> {
    for (j, &free) in available.iter().enumerate() {
        let allocated: u64 = allocation.iter().map(|row| u64::from(row[j])).sum();
        if Units::try_from(u64::from(free) + allocated).is_err() {
            return Err(BankerError::TotalOverflow {
                resource: j,
                available: free,
                allocated,
            });
        }
    }
    Ok(())
}

fn compute_need(allocation: &[Vec<Units>], max: &[Vec<Units>], resources: usize) -> BankerResult<Vec<Vec<Units>>> {
    if allocation.len() != max.len() {
        return Err(BankerError::DimensionMismatch(format!(
            "allocation has {} rows, max has {}",
            allocation.len(),
            max.len()
        )));
    }

    allocation
        .iter()
        .zip(max)
        .enumerate()
        .map(|(process, (alloc_row, max_row))| {
            if alloc_row.len() != resources || max_row.len() != resources {
                return Err(BankerError::DimensionMismatch(format!(
                    "process {process} has {} allocation and {} max columns, expected {resources}",
                    alloc_row.len(),
                    max_row.len()
                )));
            }
            alloc_row
                .iter()
                .zip(max_row)
                .enumerate()
                .map(|(resource, (&allocation, &max))| {
                    max.checked_sub(allocation).ok_or(BankerError::NegativeNeed {
                        process,
                        resource,
                        allocation,
                        max,
                    })
                })
                .collect()
        })
        .collect()
}

impl fmt::Display for BankersState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn row(values: &[Units]) -> String {
            values.iter().map(Units::to_string).collect::<Vec<_>>().join(" ")
        }

        let headers = ["Allocation", "Max", "Need", "Available"];
        let mut cells: Vec<[String; 4]> = (0..self.processes())
            .map(|i| {
                [
                    row(&self.allocation[i]),
                    row(&self.max[i]),
                    row(&self.need[i]),
                    String::new(),
                ]
            })
            .collect();
        if let Some(first) = cells.first_mut() {
            first[3] = row(&self.available);
        }

        let mut widths = headers.map(str::len);
        for line in &cells {
            for (width, cell) in widths.iter_mut().zip(line) {
                *width = (*width).max(cell.len());
            }
        }

        write!(f, "{:<6}", "")?;
        for (header, width) in headers.iter().zip(widths) {
            write!(f, "  {header:<width$}")?;
        }
        writeln!(f)?;

        for (i, line) in cells.iter().enumerate() {
            write!(f, "{:<6}", format!("P{i}"))?;
            for (cell, width) in line.iter().zip(widths) {
                write!(f, "  {cell:<width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
