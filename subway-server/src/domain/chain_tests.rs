//! Unit and property tests for section chain maintenance.

use super::*;

fn st(id: u64) -> Station {
    Station::new(StationId(id), StationName::parse(&format!("S{id}")).unwrap())
}

fn sec(up: u64, down: u64, distance: i64) -> Section {
    Section::new(st(up), st(down), Distance::new(distance).unwrap()).unwrap()
}

fn chain_of(sections: &[(u64, u64, i64)]) -> SectionChain {
    let mut chain = SectionChain::new();
    for &(up, down, distance) in sections {
        chain.insert(sec(up, down, distance)).unwrap();
    }
    chain
}

fn ids(chain: &SectionChain) -> Vec<u64> {
    chain
        .ordered_stations()
        .unwrap()
        .iter()
        .map(|s| s.id().0)
        .collect()
}

fn ordered(chain: &SectionChain) -> Vec<(u64, u64, u64)> {
    chain
        .ordered_sections()
        .unwrap()
        .iter()
        .map(|s| (s.up().id().0, s.down().id().0, s.distance().value()))
        .collect()
}

#[test]
fn empty_chain_has_no_stations() {
    let chain = SectionChain::new();
    assert!(chain.is_empty());
    assert!(chain.ordered_stations().unwrap().is_empty());
}

#[test]
fn empty_chain_accepts_any_seed() {
    let mut chain = SectionChain::new();
    chain.insert(sec(5, 9, 3)).unwrap();
    assert_eq!(ids(&chain), vec![5, 9]);
}

#[test]
fn append_and_prepend_scenario() {
    // [(S1,S2,10)] + (S2,S3,5) => S1,S2,S3; + (S4,S1,3) => S4,S1,S2,S3
    let mut chain = SectionChain::seeded(sec(1, 2, 10));

    chain.insert(sec(2, 3, 5)).unwrap();
    assert_eq!(ids(&chain), vec![1, 2, 3]);

    chain.insert(sec(4, 1, 3)).unwrap();
    assert_eq!(ids(&chain), vec![4, 1, 2, 3]);
    assert_eq!(ordered(&chain), vec![(4, 1, 3), (1, 2, 10), (2, 3, 5)]);
}

#[test]
fn split_from_shared_start() {
    // (A,C,3) into (A,B,10) => (A,C,3),(C,B,7)
    let mut chain = SectionChain::seeded(sec(1, 2, 10));
    chain.insert(sec(1, 3, 3)).unwrap();
    assert_eq!(ordered(&chain), vec![(1, 3, 3), (3, 2, 7)]);
}

#[test]
fn split_from_shared_end() {
    let mut chain = SectionChain::seeded(sec(1, 2, 10));
    chain.insert(sec(3, 2, 4)).unwrap();
    assert_eq!(ordered(&chain), vec![(1, 3, 6), (3, 2, 4)]);
}

#[test]
fn split_with_equal_or_longer_distance_rejected() {
    let mut chain = SectionChain::seeded(sec(1, 2, 10));

    let err = chain.insert(sec(1, 3, 10)).unwrap_err();
    assert!(matches!(err, TopologyError::InvalidDistance(_)));

    let err = chain.insert(sec(3, 2, 15)).unwrap_err();
    assert!(matches!(err, TopologyError::InvalidDistance(_)));

    // Rejected inserts leave the chain untouched
    assert_eq!(ordered(&chain), vec![(1, 2, 10)]);
}

#[test]
fn split_interior_section_rather_than_branch() {
    // 1 -> 2 -> 3; inserting 2 -> 4 must split (2,3), not hang off (1,2)
    let mut chain = chain_of(&[(1, 2, 5), (2, 3, 8)]);
    chain.insert(sec(2, 4, 3)).unwrap();
    assert_eq!(ordered(&chain), vec![(1, 2, 5), (2, 4, 3), (4, 3, 5)]);
}

#[test]
fn split_interior_section_from_the_rear() {
    // 1 -> 2 -> 3; inserting 4 -> 2 must split (1,2), not prepend to (2,3)
    let mut chain = chain_of(&[(1, 2, 5), (2, 3, 8)]);
    chain.insert(sec(4, 2, 2)).unwrap();
    assert_eq!(ordered(&chain), vec![(1, 4, 3), (4, 2, 2), (2, 3, 8)]);
}

#[test]
fn duplicate_adjacent_pair_rejected() {
    let mut chain = chain_of(&[(1, 2, 5), (2, 3, 8)]);
    assert_eq!(
        chain.insert(sec(1, 2, 3)).unwrap_err(),
        TopologyError::DuplicateSection(StationId(1), StationId(2))
    );
    // Reversed direction of an existing pair is also already on the line
    assert_eq!(
        chain.insert(sec(3, 2, 3)).unwrap_err(),
        TopologyError::DuplicateSection(StationId(3), StationId(2))
    );
}

#[test]
fn both_stations_present_but_apart_rejected() {
    let mut chain = chain_of(&[(1, 2, 5), (2, 3, 8)]);
    assert_eq!(
        chain.insert(sec(1, 3, 2)).unwrap_err(),
        TopologyError::DuplicateSection(StationId(1), StationId(3))
    );
}

#[test]
fn disjoint_section_rejected() {
    let mut chain = SectionChain::seeded(sec(1, 2, 10));
    assert_eq!(
        chain.insert(sec(3, 4, 5)).unwrap_err(),
        TopologyError::DisjointSection(StationId(3), StationId(4))
    );
}

#[test]
fn remove_interior_station_merges() {
    // (A,B,4),(B,C,6), remove B => (A,C,10)
    let mut chain = chain_of(&[(1, 2, 4), (2, 3, 6)]);
    chain.remove_station(StationId(2)).unwrap();
    assert_eq!(ordered(&chain), vec![(1, 3, 10)]);
}

#[test]
fn remove_first_and_last_station() {
    let mut chain = chain_of(&[(1, 2, 4), (2, 3, 6), (3, 4, 1)]);

    chain.remove_station(StationId(1)).unwrap();
    assert_eq!(ids(&chain), vec![2, 3, 4]);

    chain.remove_station(StationId(4)).unwrap();
    assert_eq!(ordered(&chain), vec![(2, 3, 6)]);
}

#[test]
fn remove_from_single_section_rejected() {
    let mut chain = SectionChain::seeded(sec(1, 2, 4));
    assert_eq!(
        chain.remove_station(StationId(1)).unwrap_err(),
        TopologyError::MinimumSectionCount
    );
    assert_eq!(
        chain.remove_station(StationId(2)).unwrap_err(),
        TopologyError::MinimumSectionCount
    );
    assert_eq!(chain.len(), 1);
}

#[test]
fn remove_unknown_station_rejected() {
    let mut chain = chain_of(&[(1, 2, 4), (2, 3, 6)]);
    assert_eq!(
        chain.remove_station(StationId(7)).unwrap_err(),
        TopologyError::StationNotInChain(StationId(7))
    );
}

#[test]
fn remove_unknown_from_single_section_reports_missing() {
    let mut chain = SectionChain::seeded(sec(1, 2, 4));
    assert_eq!(
        chain.remove_station(StationId(9)).unwrap_err(),
        TopologyError::StationNotInChain(StationId(9))
    );
}

#[test]
fn from_sections_accepts_unordered_path() {
    let chain = SectionChain::from_sections(vec![sec(2, 3, 1), sec(3, 4, 1), sec(1, 2, 1)]).unwrap();
    assert_eq!(ids(&chain), vec![1, 2, 3, 4]);
}

#[test]
fn from_sections_rejects_branch() {
    let err = SectionChain::from_sections(vec![sec(1, 2, 1), sec(1, 3, 1)]).unwrap_err();
    assert!(err.is_corruption());
}

#[test]
fn from_sections_rejects_merge_point() {
    let err = SectionChain::from_sections(vec![sec(1, 3, 1), sec(2, 3, 1)]).unwrap_err();
    assert!(err.is_corruption());
}

#[test]
fn from_sections_rejects_cycle() {
    let err = SectionChain::from_sections(vec![sec(1, 2, 1), sec(2, 3, 1), sec(3, 1, 1)])
        .unwrap_err();
    assert_eq!(err, TopologyError::BrokenChain("no unique start station"));
}

#[test]
fn from_sections_rejects_detached_loop() {
    let err = SectionChain::from_sections(vec![sec(1, 2, 1), sec(3, 4, 1), sec(4, 3, 1)])
        .unwrap_err();
    assert_eq!(
        err,
        TopologyError::BrokenChain("sections unreachable from the start station")
    );
}

#[test]
fn from_sections_rejects_two_paths() {
    let err = SectionChain::from_sections(vec![sec(1, 2, 1), sec(3, 4, 1)]).unwrap_err();
    assert_eq!(err, TopologyError::BrokenChain("no unique start station"));
}

#[test]
fn station_ids_cover_every_end() {
    let chain = chain_of(&[(1, 2, 4), (2, 3, 6)]);
    let ids = chain.station_ids();
    assert_eq!(ids.len(), 3);
    assert!(ids.contains(&StationId(3)));
    assert!(chain.contains_station(StationId(1)));
    assert!(!chain.contains_station(StationId(4)));
}

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// One attempted mutation against a chain.
    #[derive(Debug, Clone)]
    enum Op {
        /// Insert a section between two station ids.
        Insert(u64, u64, i64),
        /// Remove a station id.
        Remove(u64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (1u64..12, 1u64..12, 1i64..20).prop_map(|(u, d, dist)| Op::Insert(u, d, dist)),
            1 => (1u64..12).prop_map(Op::Remove),
        ]
    }

    fn apply(chain: &mut SectionChain, op: &Op) {
        match *op {
            Op::Insert(up, down, distance) => {
                if up != down {
                    let _ = chain.insert(sec(up, down, distance));
                }
            }
            Op::Remove(station) => {
                let _ = chain.remove_station(StationId(station));
            }
        }
    }

    fn total_distance(chain: &SectionChain) -> u64 {
        chain.sections().iter().map(|s| s.distance().value()).sum()
    }

    proptest! {
        /// Whatever is attempted, the chain stays one simple path whose
        /// consecutive stations are exactly its sections
        #[test]
        fn chain_stays_a_single_path(ops in prop::collection::vec(op(), 0..40)) {
            let mut chain = SectionChain::seeded(sec(1, 2, 20));
            for op in &ops {
                apply(&mut chain, op);
            }

            prop_assert!(!chain.is_empty());
            let stations = chain.ordered_stations().unwrap();
            let sections = chain.ordered_sections().unwrap();
            prop_assert_eq!(stations.len(), chain.len() + 1);

            for (pair, section) in stations.windows(2).zip(&sections) {
                prop_assert_eq!(&pair[0], section.up());
                prop_assert_eq!(&pair[1], section.down());
            }

            let unique: std::collections::HashSet<_> = stations.iter().map(Station::id).collect();
            prop_assert_eq!(unique.len(), stations.len());
        }

        /// The first and last ordered stations are the only station never
        /// ending a section and the only station never starting one
        #[test]
        fn ends_match_unique_start_and_end(ops in prop::collection::vec(op(), 0..40)) {
            let mut chain = SectionChain::seeded(sec(1, 2, 20));
            for op in &ops {
                apply(&mut chain, op);
            }

            let ups: std::collections::HashSet<_> =
                chain.sections().iter().map(|s| s.up().id()).collect();
            let downs: std::collections::HashSet<_> =
                chain.sections().iter().map(|s| s.down().id()).collect();
            let starts: Vec<StationId> = ups.difference(&downs).copied().collect();
            let ends: Vec<StationId> = downs.difference(&ups).copied().collect();

            let stations = chain.ordered_stations().unwrap();
            prop_assert_eq!(starts, vec![stations[0].id()]);
            prop_assert_eq!(ends, vec![stations[stations.len() - 1].id()]);
        }

        /// Splits preserve the line's total length; merges preserve it too
        #[test]
        fn interior_changes_preserve_length(
            cut in 1i64..20,
            new_station in 3u64..50,
            from_front in any::<bool>(),
        ) {
            let mut chain = SectionChain::seeded(sec(1, 2, 20));
            let candidate = if from_front {
                sec(1, new_station, cut)
            } else {
                sec(new_station, 2, cut)
            };
            chain.insert(candidate).unwrap();
            prop_assert_eq!(total_distance(&chain), 20);

            chain.remove_station(StationId(new_station)).unwrap();
            prop_assert_eq!(ordered(&chain), vec![(1, 2, 20)]);
        }

        /// A failed insert never changes the chain
        #[test]
        fn rejected_insert_is_a_no_op(up in 1u64..12, down in 1u64..12, distance in 1i64..40) {
            prop_assume!(up != down);
            let mut chain = chain_of(&[(1, 2, 5), (2, 3, 8), (3, 4, 2)]);
            let before = ordered(&chain);
            if chain.insert(sec(up, down, distance)).is_err() {
                prop_assert_eq!(ordered(&chain), before);
            }
        }
    }
}
