//! Agent records and the contiguous store that owns them.

use mycel_core::SpeciesId;
use smallvec::SmallVec;

/// One mobile agent.
///
/// Positions are continuous cell coordinates; the agent occupies the cell
/// `(floor(x), floor(y))`. `heading` is in radians and kept in `[0, 2π)`
/// after every update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Agent {
    /// Horizontal position, in cells.
    pub x: f32,
    /// Vertical position, in cells.
    pub y: f32,
    /// Direction of travel, in radians.
    pub heading: f32,
    /// Per-agent generator state for the steering wiggle.
    pub rng_state: u64,
    /// Species this agent belongs to. Also its field channel.
    pub species: SpeciesId,
}

impl Agent {
    /// Create an agent at `(x, y)` facing `heading`.
    pub fn new(x: f32, y: f32, heading: f32, species: SpeciesId, rng_state: u64) -> Self {
        Self {
            x,
            y,
            heading,
            rng_state,
            species,
        }
    }
}

/// Contiguous, fixed-size collection of agents.
///
/// Agents are never added or removed after construction. Iteration order
/// is storage order, which is also the order deposits are applied in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgentStore {
    agents: Vec<Agent>,
}

impl AgentStore {
    /// Wrap an existing set of agents.
    pub fn from_agents(agents: Vec<Agent>) -> Self {
        Self { agents }
    }

    /// Number of agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the store holds no agents.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Agent at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index)
    }

    /// All agents in storage order.
    pub fn as_slice(&self) -> &[Agent] {
        &self.agents
    }

    /// Mutable view for the agent phase.
    pub fn as_mut_slice(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    /// Iterate agents in storage order.
    pub fn iter(&self) -> std::slice::Iter<'_, Agent> {
        self.agents.iter()
    }

    /// Number of agents per species, indexed by species id.
    ///
    /// Agents whose species is `>= species_count` are not counted.
    pub fn species_counts(&self, species_count: usize) -> SmallVec<[usize; 4]> {
        let mut counts: SmallVec<[usize; 4]> = SmallVec::from_elem(0, species_count);
        for agent in &self.agents {
            if let Some(count) = counts.get_mut(agent.species.index()) {
                *count += 1;
            }
        }
        counts
    }
}

impl<'a> IntoIterator for &'a AgentStore {
    type Item = &'a Agent;
    type IntoIter = std::slice::Iter<'a, Agent>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.iter()
    }
}
