//! Actor (graph node) representation

use serde::{Deserialize, Serialize};

/// Key that identifies an actor across the trace
pub type ActorKey = String;

/// Display label of the no-sender sentinel actor
pub const EXTERNAL_ACTOR: &str = "external";

/// Node shapes of the flowchart grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NodeShape {
    #[default]
    #[serde(rename = "square")]
    Square,
    #[serde(rename = "diamond")]
    Diamond,
    #[serde(rename = "fillet")]
    Fillet,
    #[serde(rename = "rounded")]
    Rounded,
    #[serde(rename = "circle")]
    Circle,
    #[serde(rename = "circle2")]
    DoubleCircle,
    #[serde(rename = "hex")]
    Hexagon,
    #[serde(rename = "sub")]
    Subroutine,
    #[serde(rename = "flag")]
    Flag,
    #[serde(rename = "db")]
    Database,
    #[serde(rename = "parallelR")]
    ParallelRight,
    #[serde(rename = "parallelL")]
    ParallelLeft,
    #[serde(rename = "trapezoidT")]
    TrapezoidTop,
    #[serde(rename = "trapezoidB")]
    TrapezoidBottom,
}

impl NodeShape {
    /// Wrap a quoted label in the shape's brackets
    pub fn wrap(&self, label: &str) -> String {
        match self {
            NodeShape::Square => format!("[\"{}\"]", label),
            NodeShape::Diamond => format!("{{\"{}\"}}", label),
            NodeShape::Fillet => format!("(\"{}\")", label),
            NodeShape::Rounded => format!("([\"{}\"])", label),
            NodeShape::Circle => format!("((\"{}\"))", label),
            NodeShape::DoubleCircle => format!("(((\"{}\")))", label),
            NodeShape::Hexagon => format!("{{{{\"{}\"}}}}", label),
            NodeShape::Subroutine => format!("[[\"{}\"]]", label),
            NodeShape::Flag => format!(">\"{}\"]", label),
            NodeShape::Database => format!("[(\"{}\")]", label),
            NodeShape::ParallelRight => format!("[/\"{}\"/]", label),
            NodeShape::ParallelLeft => format!("[\\\"{}\"\\]", label),
            NodeShape::TrapezoidTop => format!("[/\"{}\"\\]", label),
            NodeShape::TrapezoidBottom => format!("[\\\"{}\"/]", label),
        }
    }
}

/// A node of the flow graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    /// Sequential node id, rendered as `A{id}`
    pub id: usize,
    /// Address string, or `external` for the sentinel
    pub key: ActorKey,
    pub label: String,
    pub shape: NodeShape,
}

impl Actor {
    pub fn node_name(&self) -> String {
        format!("A{}", self.id)
    }

    pub fn is_external(&self) -> bool {
        self.key == EXTERNAL_ACTOR
    }

    /// Node declaration line body, e.g. `A0["external"]`
    pub fn declaration(&self) -> String {
        format!("{}{}", self.node_name(), self.shape.wrap(&self.label))
    }
}
