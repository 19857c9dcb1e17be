//! The signaling circuits themselves: parameter sets with reference
//! constants, rate equations, and the closed-form structure (nullclines,
//! fixed points) each model admits.

mod activator_inhibitor;
mod irreversible_switch;
mod mutual_activation;
mod substrate_depletion;

pub use activator_inhibitor::{ActivatorInhibitor, ActivatorInhibitorParams};
pub use irreversible_switch::{IrreversibleSwitch, IrreversibleSwitchReduced, SwitchParams};
pub use mutual_activation::{MutualActivation, MutualActivationParams};
pub use substrate_depletion::{SubstrateDepletion, SubstrateDepletionParams};
