//! Graph algorithm suite, layered directly on [`corvid_core::graph::lpg::LpgStore`].

pub mod algorithms;
