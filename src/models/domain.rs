//! Domain description container.
//!
//! Bundles the immutable input data of a timetabling problem and the lookup
//! tables the search needs: id → index maps and a (day, period) grid for
//! contiguous-run expansion. Built once before the run; read-only afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Day, Instructor, Room, Section, Timeslot};

/// Immutable description of a timetabling problem instance.
///
/// All search-time structures reference entities by index into the vectors
/// held here; the id maps translate external string ids at the boundary.
///
/// The lookup tables are derived data: serialization skips them and
/// deserialization rebuilds them from the entity lists, so a deserialized
/// domain is fully usable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "DomainData")]
pub struct Domain {
    /// Sections to place (chromosome position = index in this vector).
    pub sections: Vec<Section>,
    /// Available rooms.
    pub rooms: Vec<Room>,
    /// Available instructors.
    pub instructors: Vec<Instructor>,
    /// The schedulable timeslot grid.
    pub timeslots: Vec<Timeslot>,

    #[serde(skip)]
    room_index: HashMap<String, usize>,
    #[serde(skip)]
    instructor_index: HashMap<String, usize>,
    #[serde(skip)]
    timeslot_index: HashMap<String, usize>,
    #[serde(skip)]
    section_index: HashMap<String, usize>,
    /// (day, period) → timeslot index, for contiguity lookups.
    #[serde(skip)]
    grid: HashMap<(Day, i32), usize>,
}

/// Wire form of a domain: the entity lists without the derived tables.
#[derive(Deserialize)]
struct DomainData {
    sections: Vec<Section>,
    rooms: Vec<Room>,
    instructors: Vec<Instructor>,
    timeslots: Vec<Timeslot>,
}

impl From<DomainData> for Domain {
    fn from(data: DomainData) -> Self {
        Domain::new(data.sections, data.rooms, data.instructors, data.timeslots)
    }
}

impl Domain {
    /// Creates a domain from its entity lists and builds the lookup tables.
    ///
    /// Structural integrity (duplicate ids, dangling references) is checked
    /// separately by [`crate::validation::validate_domain`].
    pub fn new(
        sections: Vec<Section>,
        rooms: Vec<Room>,
        instructors: Vec<Instructor>,
        timeslots: Vec<Timeslot>,
    ) -> Self {
        let room_index = rooms
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        let instructor_index = instructors
            .iter()
            .enumerate()
            .map(|(i, ins)| (ins.id.clone(), i))
            .collect();
        let timeslot_index = timeslots
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.clone(), i))
            .collect();
        let section_index = sections
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
        let grid = timeslots
            .iter()
            .enumerate()
            .map(|(i, t)| ((t.day, t.period), i))
            .collect();

        Self {
            sections,
            rooms,
            instructors,
            timeslots,
            room_index,
            instructor_index,
            timeslot_index,
            section_index,
            grid,
        }
    }

    /// Looks up a room by id.
    pub fn room_idx(&self, id: &str) -> Option<usize> {
        self.room_index.get(id).copied()
    }

    /// Looks up an instructor by id.
    pub fn instructor_idx(&self, id: &str) -> Option<usize> {
        self.instructor_index.get(id).copied()
    }

    /// Looks up a timeslot by id.
    pub fn timeslot_idx(&self, id: &str) -> Option<usize> {
        self.timeslot_index.get(id).copied()
    }

    /// Looks up a section by id.
    pub fn section_idx(&self, id: &str) -> Option<usize> {
        self.section_index.get(id).copied()
    }

    /// Expands a start slot into a contiguous same-day run of `span` slots.
    ///
    /// Returns `None` when the run would leave the day's period grid or the
    /// span is below 1.
    pub fn contiguous_run(&self, start: usize, span: i32) -> Option<Vec<usize>> {
        if span < 1 {
            return None;
        }
        let first = self.timeslots.get(start)?;
        let mut run = Vec::with_capacity(span as usize);
        for offset in 0..span {
            let idx = *self.grid.get(&(first.day, first.period + offset))?;
            run.push(idx);
        }
        Some(run)
    }

    /// Number of sections (chromosome length).
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }
}
