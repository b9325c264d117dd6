//! `resync apply` - drive every manifest resource to present

use anyhow::Result;

use super::sync;
use crate::Context;
use crate::cli::ApplyArgs;
use reconcile::DesiredState;

pub fn run(ctx: &Context, args: ApplyArgs) -> Result<()> {
    sync::run(
        ctx,
        &args.manifests,
        DesiredState::Present,
        args.timeout,
        args.allow_recreate,
    )
}
