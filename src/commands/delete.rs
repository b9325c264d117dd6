//! `resync delete` - drive every manifest resource to absent
//!
//! Deletion is only reported complete once every object is confirmed gone,
//! not when the delete calls are accepted.

use anyhow::Result;

use super::sync;
use crate::Context;
use crate::cli::DeleteArgs;
use reconcile::DesiredState;

pub fn run(ctx: &Context, args: DeleteArgs) -> Result<()> {
    sync::run(ctx, &args.manifests, DesiredState::Absent, args.timeout, false)
}
