//! External interface contract — the five operations a host exchanges
//! with the engine over a message boundary. Each [`Request`] carries an
//! opaque `id` the host echoes back; a [`Response`] is either
//! `{ id, ok: true, result }` or `{ id, ok: false, error }`.
//!
//! The transport itself (worker thread, channel, whatever carries bytes
//! between host and engine) is out of scope here — this module is just
//! the *shape* of the contract: a request/response discriminated union
//! covering the engine's five operations.

use serde::{Deserialize, Serialize};

use crate::bridge::{self, BridgeReport};
use crate::model::{HouseholdSnapshot, Inputs, PathPoint};
use crate::optimization::{
    self, AllocationResult, OptimizeResult, OptimizerOpts, Person, SplitPolicy,
};
use crate::search;
use crate::simulation::accumulate_until;
use crate::solver;

/// One of the five operations the engine answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "kebab-case")]
pub enum Operation {
    ComputeDecision {
        snapshot: HouseholdSnapshot,
        #[serde(default)]
        force_retire_age: Option<u32>,
    },
    OptimizeSavingsSplit {
        snapshot: HouseholdSnapshot,
        policy: SplitPolicy,
        #[serde(default)]
        opts: OptimizerOpts,
    },
    EarliestAgeForPlan {
        snapshot: HouseholdSnapshot,
        plan: f64,
    },
    OptimizeSplitForPlan {
        snapshot: HouseholdSnapshot,
        plan: f64,
        policy: SplitPolicy,
        #[serde(default)]
        opts: OptimizerOpts,
    },
    AllocateConcessionalByMtr {
        total_gross: f64,
        people: Vec<Person>,
    },
}

/// A request carrying an opaque `id` the host echoes back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub id: String,
    #[serde(flatten)]
    pub operation: Operation,
}

/// The earliest-age pair reported for `compute-decision`: `theoretical`
/// ignores bridge feasibility (positive sustainable spend only); `viable`
/// additionally requires the bridge to be covered and the path to never
/// deplete — the same viability test the unconstrained scan applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarliestSummary {
    pub theoretical: Option<u32>,
    pub viable: Option<u32>,
}

/// `compute-decision` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResult {
    pub sustainable_annual: Option<f64>,
    pub earliest: EarliestSummary,
    pub bridge: Option<BridgeReport>,
    pub path: Vec<PathPoint>,
    pub recommended_split: f64,
}

/// `earliest-age-for-plan` result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanAgeResult {
    pub earliest_age: Option<u32>,
    pub at_age_spend: Option<f64>,
    pub evaluations: u32,
}

/// `allocate-concessional-by-mtr` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResponse {
    pub per_person: Vec<crate::optimization::PersonAllocation>,
    pub total_allocated: f64,
}

/// The payload of a successful response, one variant per operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Decision(DecisionResult),
    OptimizeSplit(OptimizeResult),
    EarliestAgeForPlan(PlanAgeResult),
    AllocateConcessionalByMtr(AllocationResponse),
}

/// `{ id, ok: true, result }` or `{ id, ok: false, error }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Ok {
        id: String,
        ok: bool,
        result: ResponseBody,
    },
    Err {
        id: String,
        ok: bool,
        error: String,
    },
}

impl Response {
    fn ok(id: String, result: ResponseBody) -> Self {
        Response::Ok { id, ok: true, result }
    }

    fn err(id: String, error: impl std::fmt::Display) -> Self {
        Response::Err {
            id,
            ok: false,
            error: error.to_string(),
        }
    }
}

/// Dispatch a [`Request`] and produce its [`Response`]. Input-invalid
/// snapshots fail fast with `ok: false`; domain infeasibility (no viable
/// age, plan unreachable) is a normal `ok: true` result whose optional
/// fields are `None` — never an error.
#[must_use]
pub fn handle(request: Request) -> Response {
    match request.operation {
        Operation::ComputeDecision {
            snapshot,
            force_retire_age,
        } => match Inputs::normalize(&snapshot) {
            Ok(inputs) => Response::ok(
                request.id,
                ResponseBody::Decision(compute_decision(&inputs, force_retire_age)),
            ),
            Err(e) => Response::err(request.id, e),
        },
        Operation::OptimizeSavingsSplit {
            snapshot,
            policy,
            opts,
        } => match Inputs::normalize(&snapshot) {
            Ok(inputs) => Response::ok(
                request.id,
                ResponseBody::OptimizeSplit(optimization::optimize_savings_split(
                    &inputs, &policy, &opts,
                )),
            ),
            Err(e) => Response::err(request.id, e),
        },
        Operation::EarliestAgeForPlan { snapshot, plan } => match Inputs::normalize(&snapshot) {
            Ok(inputs) => {
                let result = search::find_earliest_age_for_plan(&inputs, plan, None);
                Response::ok(
                    request.id,
                    ResponseBody::EarliestAgeForPlan(PlanAgeResult {
                        earliest_age: result.earliest_age,
                        at_age_spend: result.at_age_spend,
                        evaluations: result.evaluations,
                    }),
                )
            }
            Err(e) => Response::err(request.id, e),
        },
        Operation::OptimizeSplitForPlan {
            snapshot,
            plan,
            policy,
            opts,
        } => match Inputs::normalize(&snapshot) {
            Ok(inputs) => Response::ok(
                request.id,
                ResponseBody::OptimizeSplit(optimization::optimize_savings_split_for_plan(
                    &inputs, plan, &policy, &opts,
                )),
            ),
            Err(e) => Response::err(request.id, e),
        },
        Operation::AllocateConcessionalByMtr { total_gross, people } => {
            let AllocationResult {
                per_person,
                total_allocated,
            } = optimization::allocate_concessional_by_mtr(total_gross, &people);
            Response::ok(
                request.id,
                ResponseBody::AllocateConcessionalByMtr(AllocationResponse {
                    per_person,
                    total_allocated,
                }),
            )
        }
    }
}

/// Earliest age ignoring bridge feasibility: the balance simulator alone
/// sustains a positive `S` to `lifeExp`. Weaker than [`search::find_earliest_viable`],
/// which additionally requires the bridge to be covered.
fn find_earliest_theoretical(inputs: &Inputs) -> Option<u32> {
    let cap = inputs.life_exp.saturating_sub(1).min(inputs.current_age + 60);
    for r in inputs.current_age..=cap {
        let (balances_at_r, _) = accumulate_until(inputs, r);
        let solved = solver::solve_s_base_for_age(inputs, balances_at_r, r);
        if solved.s_base > 0.0 && !solved.depleted {
            return Some(r);
        }
    }
    None
}

/// Default split policy used by `compute-decision` when the snapshot
/// carries no `preFireSavingsSplit` of its own to derive one from.
fn default_split_policy() -> SplitPolicy {
    SplitPolicy {
        max_pct: 1.0,
        cap_per_person: 27_500.0,
        eligible_people: 1,
        contrib_tax_rate: 0.15,
        outside_tax_rate: None,
        mode: crate::model::SplitMode::NetFixed,
    }
}

fn split_policy_for(inputs: &Inputs) -> SplitPolicy {
    match &inputs.pre_fire_savings_split {
        Some(split) => SplitPolicy {
            max_pct: 1.0,
            cap_per_person: split.cap_per_person,
            eligible_people: split.eligible_people,
            contrib_tax_rate: split.contrib_tax_rate,
            outside_tax_rate: split.outside_tax_rate,
            mode: split.mode,
        },
        None => default_split_policy(),
    }
}

fn compute_decision(inputs: &Inputs, force_retire_age: Option<u32>) -> DecisionResult {
    let theoretical = find_earliest_theoretical(inputs);
    let viable_result = search::find_earliest_viable(inputs);

    let policy = split_policy_for(inputs);
    let recommended_split =
        optimization::optimize_savings_split(inputs, &policy, &OptimizerOpts::default())
            .recommended_pct;

    let (sustainable_annual, bridge, path) = match force_retire_age {
        Some(age) => {
            let (balances_at_r, accum_path) = accumulate_until(inputs, age);
            let solved = solver::solve_s_base_for_age(inputs, balances_at_r, age);
            let report = bridge::compute_bridge_pv(inputs, age, solved.s_base, balances_at_r.outside);
            let mut path = accum_path;
            path.extend(solved.path_retire);
            (Some(solved.s_base), Some(report), path)
        }
        None => match &viable_result {
            Some(v) => (Some(v.s_base), Some(v.bridge), v.path.clone()),
            None => (None, None, Vec::new()),
        },
    };

    DecisionResult {
        sustainable_annual,
        earliest: EarliestSummary {
            theoretical,
            viable: viable_result.map(|v| v.age),
        },
        bridge,
        path,
        recommended_split,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SpendingBand;

    fn couple_base_snapshot() -> HouseholdSnapshot {
        HouseholdSnapshot {
            current_age: 30,
            preserve_age: 60,
            life_exp: 90,
            outside0: 100_000.0,
            super0: 200_000.0,
            annual_savings: 100_000.0,
            employer_sg_gross: 0.0,
            real_return: 0.059,
            bequest: 0.0,
            bands: vec![
                SpendingBand { end_age_incl: 60, multiplier: 1.10 },
                SpendingBand { end_age_incl: 75, multiplier: 1.00 },
                SpendingBand { end_age_incl: 200, multiplier: 0.85 },
            ],
            future_inflows: vec![],
            pre_fire_savings_split: None,
        }
    }

    #[test]
    fn compute_decision_rejects_invalid_input() {
        let mut snapshot = couple_base_snapshot();
        snapshot.outside0 = -1.0;
        let response = handle(Request {
            id: "req-1".to_string(),
            operation: Operation::ComputeDecision {
                snapshot,
                force_retire_age: None,
            },
        });
        match response {
            Response::Err { id, ok, .. } => {
                assert_eq!(id, "req-1");
                assert!(!ok);
            }
            Response::Ok { .. } => panic!("expected an input-invalid error"),
        }
    }

    #[test]
    fn compute_decision_echoes_id_and_finds_a_viable_age() {
        let response = handle(Request {
            id: "req-2".to_string(),
            operation: Operation::ComputeDecision {
                snapshot: couple_base_snapshot(),
                force_retire_age: None,
            },
        });
        match response {
            Response::Ok { id, ok, result } => {
                assert_eq!(id, "req-2");
                assert!(ok);
                let ResponseBody::Decision(decision) = result else {
                    panic!("expected a decision result");
                };
                assert!(decision.earliest.viable.is_some());
                assert!(decision.sustainable_annual.unwrap() > 0.0);
            }
            Response::Err { .. } => panic!("expected a successful decision"),
        }
    }

    #[test]
    fn allocate_concessional_by_mtr_round_trips_through_the_boundary() {
        let response = handle(Request {
            id: "req-3".to_string(),
            operation: Operation::AllocateConcessionalByMtr {
                total_gross: 20_000.0,
                people: vec![
                    Person { id: 0, headroom: 30_000.0, mtr: 0.47 },
                    Person { id: 1, headroom: 30_000.0, mtr: 0.345 },
                ],
            },
        });
        match response {
            Response::Ok { result, .. } => {
                let ResponseBody::AllocateConcessionalByMtr(allocation) = result else {
                    panic!("expected an allocation result");
                };
                assert_eq!(allocation.total_allocated, 20_000.0);
            }
            Response::Err { .. } => panic!("expected success"),
        }
    }
}
