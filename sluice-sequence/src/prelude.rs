// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Prelude module for convenient imports.
//!
//! Import everything you need with:
//! ```
//! use sluice_sequence::prelude::*;
//! ```

pub use crate::append::AppendExt;
pub use crate::catch::CatchExt;
pub use crate::collect::CollectExt;
pub use crate::combine_latest::{CombineLatestExt, CombinedState};
pub use crate::cycle::CycleExt;
pub use crate::filter::FilterExt;
pub use crate::finally::FinallyExt;
pub use crate::map::MapExt;
pub use crate::merge::MergeExt;
pub use crate::pairwise::PairwiseExt;
pub use crate::share::ShareExt;
pub use crate::source::IntoStreamExt;
pub use crate::start_with::StartWithExt;
pub use crate::switch_map::SwitchMapExt;
pub use crate::take::TakeExt;
pub use crate::take_until::{TakeUntilExt, Trigger, TriggerErrorPolicy};
pub use crate::tap::TapExt;

pub use sluice_core::{Cursor, Result, Sequence, SluiceError};
