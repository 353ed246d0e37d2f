use anyhow::Result;
use clap::Args;
use viewsim_core::catalog::{Catalog, DeviceCategory};

use super::CategoryArg;
use crate::summary;

#[derive(Args)]
pub struct DevicesArgs {
    /// Only list presets of this category
    #[arg(long, value_enum)]
    pub category: Option<CategoryArg>,
}

pub fn run(args: &DevicesArgs) -> Result<()> {
    let catalog = Catalog::builtin();
    let categories: Vec<DeviceCategory> = match args.category {
        Some(category) => vec![category.into()],
        None => DeviceCategory::SELECTABLE.to_vec(),
    };
    for category in categories {
        summary::print_device_table(category, catalog.list_by_category(category));
    }
    Ok(())
}
