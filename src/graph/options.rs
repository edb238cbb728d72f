//! Render options
//!
//! [`GraphOptions`] is one configuration layer where every field is
//! optional. Layers are merged (later wins) and then resolved against the
//! built-in defaults into an immutable [`GraphConfig`] for a single render.

use crate::graph::actor::NodeShape;
use crate::parser::CaptionRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT: &str = "build/graph.md";
pub const DEFAULT_COLOR_FORWARD: &str = "#ff4747";
pub const DEFAULT_COLOR_BACKWARD: &str = "#02dbdb";
pub const DEFAULT_COLOR_EXCESS: &str = "#0400f0";

/// Flowchart orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum ChartType {
    /// Top to bottom
    #[default]
    #[serde(rename = "TB")]
    #[value(name = "TB")]
    TopBottom,
    /// Left to right
    #[serde(rename = "LR")]
    #[value(name = "LR")]
    LeftRight,
    /// Bottom to top
    #[serde(rename = "BT")]
    #[value(name = "BT")]
    BottomTop,
    /// Right to left
    #[serde(rename = "RL")]
    #[value(name = "RL")]
    RightLeft,
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            ChartType::TopBottom => "TB",
            ChartType::LeftRight => "LR",
            ChartType::BottomTop => "BT",
            ChartType::RightLeft => "RL",
        };
        f.write_str(s)
    }
}

/// How destination actors are reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DirectionType {
    /// Destinations never seen as a sender get a fresh node each time
    Unidirectional,
    /// Every address maps to a single node
    #[default]
    Bidirectional,
}

/// Individually selectable fee components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeeComponents {
    pub compute_fee: bool,
    pub storage_fee: bool,
    pub total_fwd_fee: bool,
    pub in_forward_fee: bool,
    pub total_action_fee: bool,
}

impl FeeComponents {
    pub fn all() -> Self {
        Self {
            compute_fee: true,
            storage_fee: true,
            total_fwd_fee: true,
            in_forward_fee: true,
            total_action_fee: true,
        }
    }
}

/// Fee detail mode: a switch for all components, or a per-component map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeeDetails {
    All(bool),
    Components(FeeComponents),
}

impl Default for FeeDetails {
    fn default() -> Self {
        FeeDetails::All(false)
    }
}

impl FeeDetails {
    /// Components to list, `None` when only the aggregate fee is shown
    pub fn components(&self) -> Option<FeeComponents> {
        match self {
            FeeDetails::All(false) => None,
            FeeDetails::All(true) => Some(FeeComponents::all()),
            FeeDetails::Components(components) => Some(*components),
        }
    }
}

/// One layer of render options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    pub chart_type: Option<ChartType>,
    pub direction_type: Option<DirectionType>,
    pub output: Option<PathBuf>,
    pub hide_ok_values: Option<bool>,
    pub display_index: Option<bool>,
    pub display_op: Option<bool>,
    pub display_value: Option<bool>,
    pub display_fees: Option<bool>,
    pub display_tokens: Option<bool>,
    pub display_exit_code: Option<bool>,
    pub display_action_result: Option<bool>,
    pub display_deploy: Option<bool>,
    pub display_aborted: Option<bool>,
    pub display_destroyed: Option<bool>,
    pub display_success: Option<bool>,
    pub disable_styles: Option<bool>,
    pub fee_details: Option<FeeDetails>,
    pub show_origin: Option<bool>,
    pub color_forward: Option<String>,
    pub color_backward: Option<String>,
    pub color_excess: Option<String>,
    /// Address → display alias
    pub address_map: HashMap<String, String>,
    /// Address or alias → node shape
    pub shape_map: HashMap<String, NodeShape>,
    /// Caption decoders replacing the defaults per op code
    #[serde(skip)]
    pub captions: CaptionRegistry,
}

impl GraphOptions {
    /// Layer `overrides` on top of `self`; set fields and map entries in `overrides` win
    pub fn merge(&self, overrides: &GraphOptions) -> GraphOptions {
        let mut address_map = self.address_map.clone();
        address_map.extend(overrides.address_map.clone());
        let mut shape_map = self.shape_map.clone();
        shape_map.extend(overrides.shape_map.clone());

        GraphOptions {
            chart_type: overrides.chart_type.or(self.chart_type),
            direction_type: overrides.direction_type.or(self.direction_type),
            output: overrides.output.clone().or_else(|| self.output.clone()),
            hide_ok_values: overrides.hide_ok_values.or(self.hide_ok_values),
            display_index: overrides.display_index.or(self.display_index),
            display_op: overrides.display_op.or(self.display_op),
            display_value: overrides.display_value.or(self.display_value),
            display_fees: overrides.display_fees.or(self.display_fees),
            display_tokens: overrides.display_tokens.or(self.display_tokens),
            display_exit_code: overrides.display_exit_code.or(self.display_exit_code),
            display_action_result: overrides
                .display_action_result
                .or(self.display_action_result),
            display_deploy: overrides.display_deploy.or(self.display_deploy),
            display_aborted: overrides.display_aborted.or(self.display_aborted),
            display_destroyed: overrides.display_destroyed.or(self.display_destroyed),
            display_success: overrides.display_success.or(self.display_success),
            disable_styles: overrides.disable_styles.or(self.disable_styles),
            fee_details: overrides.fee_details.or(self.fee_details),
            show_origin: overrides.show_origin.or(self.show_origin),
            color_forward: overrides
                .color_forward
                .clone()
                .or_else(|| self.color_forward.clone()),
            color_backward: overrides
                .color_backward
                .clone()
                .or_else(|| self.color_backward.clone()),
            color_excess: overrides
                .color_excess
                .clone()
                .or_else(|| self.color_excess.clone()),
            address_map,
            shape_map,
            captions: self.captions.merged(&overrides.captions),
        }
    }

    /// Fill unset fields with the built-in defaults
    pub fn resolve(&self, default_captions: &CaptionRegistry) -> GraphConfig {
        GraphConfig {
            chart_type: self.chart_type.unwrap_or_default(),
            direction_type: self.direction_type.unwrap_or_default(),
            output: self
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            hide_ok_values: self.hide_ok_values.unwrap_or(true),
            display_index: self.display_index.unwrap_or(true),
            display_op: self.display_op.unwrap_or(true),
            display_value: self.display_value.unwrap_or(true),
            display_fees: self.display_fees.unwrap_or(true),
            display_tokens: self.display_tokens.unwrap_or(true),
            display_exit_code: self.display_exit_code.unwrap_or(true),
            display_action_result: self.display_action_result.unwrap_or(true),
            display_deploy: self.display_deploy.unwrap_or(false),
            display_aborted: self.display_aborted.unwrap_or(true),
            display_destroyed: self.display_destroyed.unwrap_or(true),
            display_success: self.display_success.unwrap_or(false),
            disable_styles: self.disable_styles.unwrap_or(false),
            fee_details: self.fee_details.unwrap_or_default(),
            show_origin: self.show_origin.unwrap_or(false),
            color_forward: self
                .color_forward
                .clone()
                .unwrap_or_else(|| DEFAULT_COLOR_FORWARD.to_string()),
            color_backward: self
                .color_backward
                .clone()
                .unwrap_or_else(|| DEFAULT_COLOR_BACKWARD.to_string()),
            color_excess: self
                .color_excess
                .clone()
                .unwrap_or_else(|| DEFAULT_COLOR_EXCESS.to_string()),
            address_map: self.address_map.clone(),
            shape_map: self.shape_map.clone(),
            captions: default_captions.merged(&self.captions),
        }
    }
}

/// Fully resolved, immutable options for one render
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub chart_type: ChartType,
    pub direction_type: DirectionType,
    pub output: PathBuf,
    pub hide_ok_values: bool,
    pub display_index: bool,
    pub display_op: bool,
    pub display_value: bool,
    pub display_fees: bool,
    pub display_tokens: bool,
    pub display_exit_code: bool,
    pub display_action_result: bool,
    pub display_deploy: bool,
    pub display_aborted: bool,
    pub display_destroyed: bool,
    pub display_success: bool,
    pub disable_styles: bool,
    pub fee_details: FeeDetails,
    pub show_origin: bool,
    pub color_forward: String,
    pub color_backward: String,
    pub color_excess: String,
    pub address_map: HashMap<String, String>,
    pub shape_map: HashMap<String, NodeShape>,
    pub captions: CaptionRegistry,
}

impl GraphConfig {
    /// Built-in defaults < `base` < `overrides`
    pub fn layered(
        base: &GraphOptions,
        overrides: &GraphOptions,
        default_captions: &CaptionRegistry,
    ) -> Self {
        base.merge(overrides).resolve(default_captions)
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        GraphOptions::default().resolve(CaptionRegistry::shared_defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{CaptionParams, Captions};

    #[test]
    fn test_defaults() {
        let config = GraphConfig::default();
        assert_eq!(config.chart_type, ChartType::TopBottom);
        assert_eq!(config.direction_type, DirectionType::Bidirectional);
        assert_eq!(config.output, PathBuf::from("build/graph.md"));
        assert!(config.hide_ok_values);
        assert!(config.display_index && config.display_op && config.display_value);
        assert!(config.display_fees && config.display_tokens);
        assert!(config.display_exit_code && config.display_action_result);
        assert!(config.display_aborted && config.display_destroyed);
        assert!(!config.display_deploy);
        assert!(!config.display_success);
        assert!(!config.disable_styles);
        assert!(!config.show_origin);
        assert_eq!(config.fee_details.components(), None);
        assert_eq!(config.color_forward, "#ff4747");
        assert_eq!(config.color_backward, "#02dbdb");
        assert_eq!(config.color_excess, "#0400f0");
        assert_eq!(config.captions.len(), 6);
    }

    #[test]
    fn test_layering_order() {
        let base = GraphOptions {
            chart_type: Some(ChartType::LeftRight),
            hide_ok_values: Some(false),
            address_map: HashMap::from([
                ("a".to_string(), "Alice".to_string()),
                ("b".to_string(), "Bob".to_string()),
            ]),
            ..Default::default()
        };
        let overrides = GraphOptions {
            hide_ok_values: Some(true),
            address_map: HashMap::from([("b".to_string(), "Robert".to_string())]),
            ..Default::default()
        };

        let config = GraphConfig::layered(&base, &overrides, &CaptionRegistry::with_defaults());
        assert_eq!(config.chart_type, ChartType::LeftRight);
        assert!(config.hide_ok_values);
        assert_eq!(config.address_map["a"], "Alice");
        assert_eq!(config.address_map["b"], "Robert");
        // untouched fields fall back to built-in defaults
        assert!(config.display_index);
    }

    #[test]
    fn test_caption_override_replaces_single_op() {
        fn noop(_: &CaptionParams<'_>) -> crate::Result<Captions> {
            Ok(Captions::new())
        }

        let overrides = GraphOptions {
            captions: CaptionRegistry::new().with(0x25938561, noop).with(0x1234, noop),
            ..Default::default()
        };
        let config = GraphConfig::layered(
            &GraphOptions::default(),
            &overrides,
            &CaptionRegistry::with_defaults(),
        );
        assert_eq!(config.captions.len(), 7);
        assert!(config.captions.contains(0x178d4519));
    }

    #[test]
    fn test_fee_details_forms() {
        let opts: GraphOptions = toml::from_str("fee_details = true").unwrap();
        assert_eq!(opts.fee_details, Some(FeeDetails::All(true)));

        let opts: GraphOptions = toml::from_str("fee_details = { computeFee = true }").unwrap();
        let components = opts.fee_details.unwrap().components().unwrap();
        assert!(components.compute_fee);
        assert!(!components.storage_fee);
    }

    #[test]
    fn test_parse_options_toml() {
        let toml = r##"
chart_type = "LR"
direction_type = "unidirectional"
color_forward = "#000000"

[address_map]
"0:abc" = "wallet"

[shape_map]
wallet = "circle"
        "##;

        let opts: GraphOptions = toml::from_str(toml).unwrap();
        assert_eq!(opts.chart_type, Some(ChartType::LeftRight));
        assert_eq!(opts.direction_type, Some(DirectionType::Unidirectional));
        assert_eq!(opts.color_forward.as_deref(), Some("#000000"));
        assert_eq!(opts.shape_map["wallet"], NodeShape::Circle);
    }
}
