//! The fixed 5-phase workflow catalog.
//!
//! Every PhaseTrack project moves through the same five phases:
//! Requirements -> Planning -> Implementation -> Verification -> Release.
//! The catalog is compiled in, never persisted, and consulted by both the
//! checkpoint store (progress rendering, role/task defaults) and the
//! command layer (validation, display). Pure data — no I/O.

/// A single phase of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDescriptor {
    /// Phase number, 1-5.
    pub number: u8,

    /// Short phase name ("Requirements", "Planning", ...).
    pub name: &'static str,

    /// Responsible role label ("Product Manager", ...).
    pub role: &'static str,

    /// One-line role + goal summary shown in status output.
    pub description: &'static str,

    /// Ordered task sequence for this phase. The first entry is the
    /// default task when entering the phase.
    pub tasks: &'static [&'static str],
}

impl PhaseDescriptor {
    /// Default task when this phase starts.
    #[must_use]
    pub fn first_task(&self) -> &'static str {
        self.tasks[0]
    }

    /// The task following `task` within this phase, if any.
    ///
    /// Returns `None` when `task` is the last task or is not in the
    /// catalog sequence (hand-edited checkpoints routinely carry
    /// free-form task text).
    #[must_use]
    pub fn next_task(&self, task: &str) -> Option<&'static str> {
        let pos = self.tasks.iter().position(|t| *t == task)?;
        self.tasks.get(pos + 1).copied()
    }
}

/// The immutable workflow table.
pub static PHASES: [PhaseDescriptor; 5] = [
    PhaseDescriptor {
        number: 1,
        name: "Requirements",
        role: "Product Manager",
        description: "Product Manager - Define specifications",
        tasks: &[
            "Analyze project requirements and create specification document",
            "Perform competitive analysis and market research",
            "Define acceptance criteria and success metrics",
            "Document functional and non-functional requirements",
        ],
    },
    PhaseDescriptor {
        number: 2,
        name: "Planning",
        role: "Software Architect",
        description: "Software Architect - Design architecture",
        tasks: &[
            "Design system architecture and component structure",
            "Select technology stack and document tradeoffs",
            "Break the design into implementation milestones",
        ],
    },
    PhaseDescriptor {
        number: 3,
        name: "Implementation",
        role: "Senior Developer",
        description: "Senior Developer - Build code",
        tasks: &[
            "Implement core modules following the architecture plan",
            "Write unit tests alongside each module",
            "Review and refactor for code quality",
        ],
    },
    PhaseDescriptor {
        number: 4,
        name: "Verification",
        role: "QA Lead",
        description: "QA Lead - Test and validate",
        tasks: &[
            "Execute test plan and record results",
            "Perform regression and edge case testing",
            "Validate acceptance criteria against requirements",
        ],
    },
    PhaseDescriptor {
        number: 5,
        name: "Release",
        role: "Release Manager",
        description: "Release Manager - Deploy and release",
        tasks: &[
            "Coordinate final release preparation",
            "Prepare release notes and changelog",
            "Execute deployment and monitor initial performance",
        ],
    },
];

/// Look up a phase by number. Returns `None` outside 1-5.
#[must_use]
pub fn describe(number: u8) -> Option<&'static PhaseDescriptor> {
    PHASES.iter().find(|p| p.number == number)
}

/// All phases in workflow order.
#[must_use]
pub fn all() -> &'static [PhaseDescriptor; 5] {
    &PHASES
}

/// First phase number.
pub const FIRST_PHASE: u8 = 1;

/// Last phase number. `advance()` saturates here.
pub const LAST_PHASE: u8 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_returns_matching_number() {
        for n in 1..=5 {
            let phase = describe(n).unwrap();
            assert_eq!(phase.number, n);
        }
    }

    #[test]
    fn test_describe_out_of_range() {
        assert!(describe(0).is_none());
        assert!(describe(6).is_none());
        assert!(describe(99).is_none());
    }

    #[test]
    fn test_table_is_ordered_and_complete() {
        let numbers: Vec<u8> = all().iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);

        for phase in all() {
            assert!(!phase.name.is_empty());
            assert!(!phase.role.is_empty());
            assert!(!phase.tasks.is_empty());
        }
    }

    #[test]
    fn test_phase_one_details() {
        let phase = describe(1).unwrap();
        assert_eq!(phase.name, "Requirements");
        assert_eq!(phase.role, "Product Manager");
        assert_eq!(
            phase.first_task(),
            "Analyze project requirements and create specification document"
        );
        assert_eq!(phase.description, "Product Manager - Define specifications");
    }

    #[test]
    fn test_phase_five_details() {
        let phase = describe(5).unwrap();
        assert_eq!(phase.name, "Release");
        assert_eq!(phase.role, "Release Manager");
        assert_eq!(phase.first_task(), "Coordinate final release preparation");
    }

    #[test]
    fn test_next_task_steps_through_sequence() {
        let phase = describe(1).unwrap();
        assert_eq!(
            phase.next_task("Analyze project requirements and create specification document"),
            Some("Perform competitive analysis and market research")
        );
        // Last task has no successor
        assert_eq!(
            phase.next_task("Document functional and non-functional requirements"),
            None
        );
        // Free-form task text is not an error
        assert_eq!(phase.next_task("hand-written task"), None);
    }
}
