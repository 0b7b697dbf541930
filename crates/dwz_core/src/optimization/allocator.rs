//! `allocateConcessionalByMTR` — MTR-aware per-person split of an aggregate
//! super allocation (spec §4.E "MTR-aware per-person allocation").

use serde::{Deserialize, Serialize};

/// One basis point, the MTR-equality tolerance used for grouping (spec
/// §4.E step 1).
const MTR_TOLERANCE: f64 = 0.0001;

/// A household member eligible for concessional contributions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: u32,
    /// Remaining concessional-cap headroom after mandatory employer
    /// contributions: `max(0, cap - sgGross)`.
    pub headroom: f64,
    pub mtr: f64,
}

/// This person's share of the aggregate allocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonAllocation {
    pub id: u32,
    pub ss_gross: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub per_person: Vec<PersonAllocation>,
    pub total_allocated: f64,
}

/// Split `total_gross` across `people`, filling higher-MTR groups first and
/// splitting pro-rata by headroom within a group (spec §4.E steps 1-4).
///
/// Invariants held: `Σ ssGross ≤ totalGross`; no person exceeds their
/// headroom; ties in MTR (within 1 basis point) split pro-rata.
#[must_use]
pub fn allocate_concessional_by_mtr(total_gross: f64, people: &[Person]) -> AllocationResult {
    // `total_cmp` gives a total order over every `f64` bit pattern, including
    // `NaN`, so a malformed `mtr` sorts to a deterministic position instead
    // of unwinding across the message boundary (spec §7).
    let mut sorted: Vec<Person> = people.to_vec();
    sorted.sort_by(|a, b| b.mtr.total_cmp(&a.mtr));

    let mut groups: Vec<Vec<Person>> = Vec::new();
    for person in sorted {
        let joins_last = groups
            .last()
            .is_some_and(|group| (group[0].mtr - person.mtr).abs() <= MTR_TOLERANCE);
        if joins_last {
            groups.last_mut().unwrap().push(person);
        } else {
            groups.push(vec![person]);
        }
    }

    let mut remaining = total_gross;
    let mut allocations: std::collections::HashMap<u32, f64> = std::collections::HashMap::new();
    for group in &groups {
        if remaining <= 0.0 {
            break;
        }
        let group_headroom: f64 = group.iter().map(|p| p.headroom).sum();
        if group_headroom <= 0.0 {
            continue;
        }
        let group_alloc = remaining.min(group_headroom);
        for person in group {
            let share = group_alloc * (person.headroom / group_headroom);
            allocations.insert(person.id, share.round());
            // Reduce remaining by the unrounded share so per-person rounding
            // doesn't drift the running total (spec §4.E step 4).
            remaining -= share;
        }
    }

    let per_person: Vec<PersonAllocation> = people
        .iter()
        .map(|p| PersonAllocation {
            id: p.id,
            ss_gross: *allocations.get(&p.id).unwrap_or(&0.0),
        })
        .collect();
    let total_allocated = per_person.iter().map(|p| p.ss_gross).sum();

    AllocationResult {
        per_person,
        total_allocated,
    }
}
