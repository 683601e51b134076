//! The chain of sections belonging to one line.
//!
//! Sections are stored unordered. Order is recovered on demand by finding
//! the one station that no section ends at and following sections from
//! there, using an index keyed by each section's up station.

use std::collections::{HashMap, HashSet};

use super::{Section, Station, StationId, TopologyError};

/// All sections of one line.
///
/// # Invariants
///
/// After every successful mutation:
/// - Every station starts at most one section and ends at most one section
/// - A non-empty chain has exactly one start station and one end station,
///   and every section is reachable from the start
/// - Once seeded, the chain never drops below one section
///
/// Mutations are all-or-nothing: a rejected insert or removal leaves the
/// chain exactly as it was.
#[derive(Debug, Clone, Default)]
pub struct SectionChain {
    sections: Vec<Section>,
}

impl SectionChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chain holding a single seed section.
    pub fn seeded(section: Section) -> Self {
        Self {
            sections: vec![section],
        }
    }

    /// Rebuild a chain from stored sections, checking they form one path.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::BrokenChain`] if the sections branch, loop,
    /// or fall apart into several pieces.
    pub fn from_sections(sections: Vec<Section>) -> Result<Self, TopologyError> {
        let chain = Self { sections };
        chain.ordered_sections()?;
        Ok(chain)
    }

    /// Returns the sections in storage order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Returns the number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns true if the chain has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Returns true if any section starts or ends at the station.
    pub fn contains_station(&self, station: StationId) -> bool {
        self.sections.iter().any(|s| s.contains(station))
    }

    /// Returns the ids of every station on the chain, in no particular order.
    pub fn station_ids(&self) -> HashSet<StationId> {
        self.sections
            .iter()
            .flat_map(|s| s.stations())
            .map(Station::id)
            .collect()
    }

    /// Add a section to the chain.
    ///
    /// An empty chain accepts any section as its seed. Otherwise exactly
    /// one end of the candidate must already be on the chain:
    ///
    /// - If that station starts (or ends) an existing section on the side
    ///   the candidate covers, the existing section is split: it is
    ///   replaced by the remainder and the candidate is added.
    /// - If the station is the chain's first (or last) station and the
    ///   candidate points away from the chain, the candidate is added as
    ///   the new first (or last) section.
    ///
    /// # Errors
    ///
    /// - [`TopologyError::DuplicateSection`] if both ends are already on the chain
    /// - [`TopologyError::DisjointSection`] if neither end is on the chain
    /// - [`TopologyError::InvalidDistance`] if a split section is not longer
    ///   than the candidate
    /// - [`TopologyError::BrokenChain`] if the candidate docks onto more
    ///   than one section in the same way
    ///
    /// # Examples
    ///
    /// ```
    /// use subway_server::domain::{Distance, Section, SectionChain, Station, StationId, StationName};
    ///
    /// let st = |id: u64, name: &str| Station::new(StationId(id), StationName::parse(name).unwrap());
    /// let (a, b, c) = (st(1, "A"), st(2, "B"), st(3, "C"));
    ///
    /// let mut chain = SectionChain::seeded(
    ///     Section::new(a.clone(), b.clone(), Distance::new(10).unwrap()).unwrap(),
    /// );
    ///
    /// // Splice C between A and B
    /// chain
    ///     .insert(Section::new(a.clone(), c.clone(), Distance::new(3).unwrap()).unwrap())
    ///     .unwrap();
    ///
    /// let names: Vec<_> = chain
    ///     .ordered_stations()
    ///     .unwrap()
    ///     .iter()
    ///     .map(|s| s.name().to_string())
    ///     .collect();
    /// assert_eq!(names, ["A", "C", "B"]);
    /// ```
    pub fn insert(&mut self, candidate: Section) -> Result<(), TopologyError> {
        if self.sections.is_empty() {
            self.sections.push(candidate);
            return Ok(());
        }

        let up = candidate.up().id();
        let down = candidate.down().id();
        let up_known = self.contains_station(up);
        let down_known = self.contains_station(down);

        if up_known && down_known {
            return Err(TopologyError::DuplicateSection(up, down));
        }
        if !up_known && !down_known {
            return Err(TopologyError::DisjointSection(up, down));
        }

        let mut split_at = None;
        let mut terminal_at = None;
        for (idx, existing) in self.sections.iter().enumerate() {
            let position = candidate.docking_position(existing);
            let slot = if position.is_split() {
                &mut split_at
            } else if position.is_terminal() {
                &mut terminal_at
            } else {
                continue;
            };
            if slot.replace(idx).is_some() {
                return Err(TopologyError::BrokenChain(
                    "section docks onto more than one section",
                ));
            }
        }

        // Splitting an interior section wins over extending past its
        // neighbour at the same station.
        match (split_at, terminal_at) {
            (Some(idx), _) => {
                let remainder = self.sections[idx].split_by(&candidate)?;
                self.sections[idx] = remainder;
                self.sections.push(candidate);
            }
            (None, Some(_)) => self.sections.push(candidate),
            (None, None) => {
                return Err(TopologyError::BrokenChain(
                    "known station has no section to dock onto",
                ));
            }
        }
        Ok(())
    }

    /// Returns the sections in travel order, first station first.
    ///
    /// An empty chain yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::BrokenChain`] if there is not exactly one
    /// start station, a station starts or ends two sections, or some
    /// sections cannot be reached from the start.
    pub fn ordered_sections(&self) -> Result<Vec<&Section>, TopologyError> {
        if self.sections.is_empty() {
            return Ok(Vec::new());
        }

        let mut by_up: HashMap<StationId, &Section> = HashMap::with_capacity(self.sections.len());
        let mut downs: HashSet<StationId> = HashSet::with_capacity(self.sections.len());
        for section in &self.sections {
            if by_up.insert(section.up().id(), section).is_some() {
                return Err(TopologyError::BrokenChain(
                    "station starts more than one section",
                ));
            }
            if !downs.insert(section.down().id()) {
                return Err(TopologyError::BrokenChain(
                    "station ends more than one section",
                ));
            }
        }

        let mut starts = self
            .sections
            .iter()
            .filter(|s| !downs.contains(&s.up().id()));
        let start = match (starts.next(), starts.next()) {
            (Some(first), None) => first.up().id(),
            _ => return Err(TopologyError::BrokenChain("no unique start station")),
        };

        let mut ordered = Vec::with_capacity(self.sections.len());
        let mut current = start;
        while let Some(section) = by_up.get(&current) {
            ordered.push(*section);
            current = section.down().id();
        }

        if ordered.len() != self.sections.len() {
            return Err(TopologyError::BrokenChain(
                "sections unreachable from the start station",
            ));
        }
        Ok(ordered)
    }

    /// Returns the stations in travel order.
    ///
    /// # Errors
    ///
    /// Same as [`SectionChain::ordered_sections`].
    pub fn ordered_stations(&self) -> Result<Vec<Station>, TopologyError> {
        let sections = self.ordered_sections()?;
        let Some(first) = sections.first() else {
            return Ok(Vec::new());
        };

        let mut stations = Vec::with_capacity(sections.len() + 1);
        stations.push(first.up().clone());
        stations.extend(sections.iter().map(|s| s.down().clone()));
        Ok(stations)
    }

    /// Take a station off the chain.
    ///
    /// The first or last station takes its one section with it. An interior
    /// station's two sections are merged into one spanning both, with the
    /// combined distance.
    ///
    /// # Errors
    ///
    /// - [`TopologyError::StationNotInChain`] if no section touches the station
    /// - [`TopologyError::MinimumSectionCount`] if only one section is left
    pub fn remove_station(&mut self, station: StationId) -> Result<(), TopologyError> {
        let before = self.sections.iter().position(|s| s.down().id() == station);
        let after = self.sections.iter().position(|s| s.up().id() == station);

        match (before, after) {
            (None, None) => return Err(TopologyError::StationNotInChain(station)),
            _ if self.sections.len() <= 1 => return Err(TopologyError::MinimumSectionCount),
            (Some(prev), Some(next)) => {
                let merged = self.sections[prev].merge(&self.sections[next])?;
                // Remove the higher index first so the lower one stays valid.
                let (hi, lo) = if prev > next { (prev, next) } else { (next, prev) };
                self.sections.swap_remove(hi);
                self.sections.swap_remove(lo);
                self.sections.push(merged);
            }
            (Some(idx), None) | (None, Some(idx)) => {
                self.sections.swap_remove(idx);
            }
        }
        Ok(())
    }
}
