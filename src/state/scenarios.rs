//! Conversation steps and the transition table
//!
//! Each workflow is a fixed linear wizard. `ScenarioManager` knows which
//! step may follow which and refuses anything else.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::errors::{GameKeeperError, Result};
use crate::utils::logging::log_transition;
use super::context::ConversationContext;

/// A named stage of a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Step {
    Start,
    ChoosingSource,
    MainMenu,
    AddingName,
    AddingCategory,
    AddingMin,
    AddingMax,
    DeletingSelect,
    DeletingConfirm,
    EditingSelect,
    EditingField,
    PlanningSelect,
    PlanningDate,
    PlanningTime,
}

impl Step {
    pub const ALL: [Step; 14] = [
        Step::Start,
        Step::ChoosingSource,
        Step::MainMenu,
        Step::AddingName,
        Step::AddingCategory,
        Step::AddingMin,
        Step::AddingMax,
        Step::DeletingSelect,
        Step::DeletingConfirm,
        Step::EditingSelect,
        Step::EditingField,
        Step::PlanningSelect,
        Step::PlanningDate,
        Step::PlanningTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Start => "START",
            Step::ChoosingSource => "CHOOSING_SOURCE",
            Step::MainMenu => "MAIN_MENU",
            Step::AddingName => "ADDING_NAME",
            Step::AddingCategory => "ADDING_CATEGORY",
            Step::AddingMin => "ADDING_MIN",
            Step::AddingMax => "ADDING_MAX",
            Step::DeletingSelect => "DELETING_SELECT",
            Step::DeletingConfirm => "DELETING_CONFIRM",
            Step::EditingSelect => "EDITING_SELECT",
            Step::EditingField => "EDITING_FIELD",
            Step::PlanningSelect => "PLANNING_SELECT",
            Step::PlanningDate => "PLANNING_DATE",
            Step::PlanningTime => "PLANNING_TIME",
        }
    }

    /// The multi-step workflow this step belongs to, if any
    pub fn workflow(&self) -> Option<Workflow> {
        match self {
            Step::AddingName | Step::AddingCategory | Step::AddingMin | Step::AddingMax => Some(Workflow::Adding),
            Step::DeletingSelect | Step::DeletingConfirm => Some(Workflow::Deleting),
            Step::EditingSelect | Step::EditingField => Some(Workflow::Editing),
            Step::PlanningSelect | Step::PlanningDate | Step::PlanningTime => Some(Workflow::Planning),
            Step::Start | Step::ChoosingSource | Step::MainMenu => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workflow {
    Adding,
    Deleting,
    Editing,
    Planning,
}

impl Workflow {
    /// Translation key of the message sent when the workflow is cancelled
    pub fn cancel_message_key(&self) -> &'static str {
        match self {
            Workflow::Adding => "adding.cancelled",
            Workflow::Deleting => "deleting.cancelled",
            Workflow::Editing => "editing.cancelled",
            Workflow::Planning => "planning.cancelled",
        }
    }
}

/// Owns the allowed transitions between steps
#[derive(Debug, Clone)]
pub struct ScenarioManager {
    transitions: HashMap<Step, Vec<Step>>,
}

impl Default for ScenarioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioManager {
    pub fn new() -> Self {
        let mut manager = Self {
            transitions: HashMap::new(),
        };

        manager.register(Step::Start, &[Step::ChoosingSource]);
        manager.register(Step::ChoosingSource, &[Step::MainMenu]);
        manager.register(
            Step::MainMenu,
            &[Step::AddingName, Step::DeletingSelect, Step::EditingSelect, Step::PlanningSelect],
        );

        manager.register(Step::AddingName, &[Step::AddingCategory]);
        manager.register(Step::AddingCategory, &[Step::AddingMin]);
        manager.register(Step::AddingMin, &[Step::AddingMax]);
        manager.register(Step::AddingMax, &[Step::MainMenu]);

        manager.register(Step::DeletingSelect, &[Step::DeletingConfirm]);
        manager.register(Step::DeletingConfirm, &[Step::MainMenu]);

        manager.register(Step::EditingSelect, &[Step::EditingField]);
        manager.register(Step::EditingField, &[Step::EditingSelect, Step::MainMenu]);

        manager.register(Step::PlanningSelect, &[Step::PlanningDate]);
        manager.register(Step::PlanningDate, &[Step::PlanningTime]);
        manager.register(Step::PlanningTime, &[Step::MainMenu]);

        manager
    }

    fn register(&mut self, from: Step, next_steps: &[Step]) {
        self.transitions.insert(from, next_steps.to_vec());
    }

    /// Steps reachable from `from` in one forward move
    pub fn next_steps(&self, from: Step) -> &[Step] {
        self.transitions.get(&from).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the forward table allows `from -> to`.
    ///
    /// Staying put, returning to the main menu and going back to source
    /// selection are always allowed.
    pub fn is_allowed(&self, from: Step, to: Step) -> bool {
        from == to
            || to == Step::MainMenu
            || to == Step::ChoosingSource
            || self.next_steps(from).contains(&to)
    }

    /// Back and cancel are honored everywhere except before the welcome
    pub fn is_interruptible(&self, step: Step) -> bool {
        step != Step::Start
    }

    /// Move the conversation to `to`, rejecting edges outside the table
    pub fn transition(&self, context: &mut ConversationContext, to: Step) -> Result<()> {
        let from = context.step;
        if !self.is_allowed(from, to) {
            return Err(GameKeeperError::InvalidStateTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        if from != to {
            log_transition(context.user_id, from.as_str(), to.as_str());
        }
        context.set_step(to);
        Ok(())
    }

    /// Drop everything staged and return to the main menu
    pub fn reset_to_menu(&self, context: &mut ConversationContext) {
        context.clear();
        if context.step != Step::MainMenu {
            log_transition(context.user_id, context.step.as_str(), Step::MainMenu.as_str());
        }
        context.set_step(Step::MainMenu);
    }
}
