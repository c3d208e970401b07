#![allow(dead_code)]

pub mod jigsaw;
pub mod session;
pub mod sim;
pub mod solver;

pub mod utils {
    pub mod prelude {
        pub use anyhow::{anyhow, Context, Error};
        pub type Result<T> = anyhow::Result<T, Error>;

        pub use std::{
            ops::{Add, Sub},
            time::Duration
        };
    }
}

pub mod prelude {
    pub use super::jigsaw::prelude::*;
    pub use super::session::*;
    pub use super::sim::*;
    pub use super::solver::*;
    pub use super::utils::prelude::*;
}
