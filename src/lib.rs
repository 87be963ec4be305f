//! EON planner
//!
//! エラスティック光ネットワークのRMSA評価と，リンク追加候補トポロジの探索を行う

pub mod candidate;
pub mod config;
pub mod controller;
pub mod debugger;
pub mod demand;
pub mod eon_core;
pub mod error;
pub mod loader;
pub mod modulation;
pub mod topology;
pub mod utils;

pub use eon_core::{ Edge, NodeId, SD };
pub use error::{ EonError, EonResult };
