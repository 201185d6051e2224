//! Reconciliation of ledger credits against the external source of truth.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::error::EngineResult;
use crate::models::{CreditId, OvertimeCredit};

use super::Ledger;

/// Confirms that a raw attendance source still backs a credit.
pub trait ExternalLookup {
    /// Returns true when the record behind `source_reference` still shows a
    /// positive overtime amount for the employee on `date`.
    fn confirm(&self, employee_id: &str, source_reference: &str, date: NaiveDate)
    -> EngineResult<bool>;
}

/// Checks every credit in the ledger and returns the number of divergences.
///
/// Each credit's diagnostic is cleared when the lookup agrees and set when it
/// disagrees or fails. Hours and status are never modified and lookup errors
/// are counted, not propagated.
pub fn validate(ledger: &mut Ledger, lookup: &dyn ExternalLookup) -> usize {
    let targets = targets(ledger.credits().iter());
    run(ledger, lookup, targets)
}

/// Like [`validate`], restricted to one employee's credits.
pub fn validate_employee(ledger: &mut Ledger, lookup: &dyn ExternalLookup, employee_id: &str) -> usize {
    let targets = targets(ledger.credits_for(employee_id).into_iter());
    run(ledger, lookup, targets)
}

struct Target {
    credit_id: CreditId,
    employee_id: String,
    source_reference: String,
    date: NaiveDate,
}

fn targets<'a>(credits: impl Iterator<Item = &'a OvertimeCredit>) -> Vec<Target> {
    credits
        .map(|c| Target {
            credit_id: c.id.clone(),
            employee_id: c.employee_id.clone(),
            source_reference: c.source_reference.clone(),
            date: c.date,
        })
        .collect()
}

fn run(ledger: &mut Ledger, lookup: &dyn ExternalLookup, targets: Vec<Target>) -> usize {
    let checked = targets.len();
    let mut divergences = 0;

    for target in targets {
        let diagnostic = match lookup.confirm(&target.employee_id, &target.source_reference, target.date) {
            Ok(true) => None,
            Ok(false) => Some(format!(
                "source '{}' shows no matching overtime on {}",
                target.source_reference, target.date
            )),
            Err(e) => Some(format!("lookup failed: {}", e)),
        };

        if let Some(message) = &diagnostic {
            divergences += 1;
            warn!(
                credit_id = %target.credit_id,
                employee_id = %target.employee_id,
                diagnostic = %message,
                "Credit diverges from source"
            );
        } else {
            debug!(credit_id = %target.credit_id, "Credit confirmed by source");
        }

        if let Err(e) = ledger.annotate(&target.credit_id, diagnostic) {
            warn!(credit_id = %target.credit_id, error = %e, "Could not annotate credit");
        }
    }

    info!(checked, divergences, "Reconciliation complete");
    divergences
}
