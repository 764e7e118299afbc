//! Scene-scoped foreshadowing instructions for the drafting model.

use serde::{Deserialize, Serialize};

use story_model::AllowedExpression;

/// What the scene should do with a foreshadowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstructionAction {
    Plant,
    Reinforce,
    Hint,
    Reveal,
    #[default]
    None,
}

/// Instruction for one foreshadowing within a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeshadowInstruction {
    pub foreshadowing_id: String,

    #[serde(default)]
    pub action: InstructionAction,

    #[serde(default)]
    pub allowed_expressions: Vec<AllowedExpression>,

    #[serde(default)]
    pub forbidden_expressions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtlety_target: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ForeshadowInstruction {
    pub fn new(foreshadowing_id: impl Into<String>, action: InstructionAction) -> Self {
        Self {
            foreshadowing_id: foreshadowing_id.into(),
            action,
            allowed_expressions: Vec::new(),
            forbidden_expressions: Vec::new(),
            subtlety_target: None,
            note: None,
        }
    }

    pub fn with_forbidden_expression(mut self, expression: impl Into<String>) -> Self {
        self.forbidden_expressions.push(expression.into());
        self
    }

    pub fn with_allowed_expression(mut self, expression: AllowedExpression) -> Self {
        self.allowed_expressions.push(expression);
        self
    }

    pub fn is_active(&self) -> bool {
        self.action != InstructionAction::None
    }
}

/// All foreshadowing instructions for a scene.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForeshadowInstructions {
    pub scene_id: String,

    #[serde(default)]
    pub instructions: Vec<ForeshadowInstruction>,
}

impl ForeshadowInstructions {
    pub fn new(scene_id: impl Into<String>) -> Self {
        Self {
            scene_id: scene_id.into(),
            instructions: Vec::new(),
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn with_instruction(mut self, instruction: ForeshadowInstruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    /// Instructions whose action is not `none`.
    pub fn active(&self) -> impl Iterator<Item = &ForeshadowInstruction> {
        self.instructions.iter().filter(|i| i.is_active())
    }

    /// Union of forbidden expressions over active instructions, first-seen order.
    pub fn forbidden_expressions(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for expression in self.active().flat_map(|i| &i.forbidden_expressions) {
            if !out.contains(expression) {
                out.push(expression.clone());
            }
        }
        out
    }
}
