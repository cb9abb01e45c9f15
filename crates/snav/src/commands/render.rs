use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use anyhow::Result;
use snav_catalog::Catalog;
use snav_conf::Settings;
use snav_core::find_expandable;
use snav_core::trim_tree;
use snav_core::NavigationBuilder;

use crate::commands::Command;
use crate::fixture::Fixture;
use crate::output::render_tree;

#[derive(Debug, clap::Args)]
pub struct Render {
    /// Fixture file describing the catalog and the page view
    pub fixture: PathBuf,

    /// Also print the client expansion payload as JSON
    #[arg(long)]
    pub expandable: bool,
}

impl Command for Render {
    fn execute(&self) -> Result<ExitCode> {
        let fixture = Fixture::load(&self.fixture)
            .with_context(|| format!("failed to load fixture {}", self.fixture.display()))?;
        let root = self.fixture.parent().unwrap_or_else(|| Path::new("."));
        let settings = Settings::new(root).context("failed to load settings")?;

        let (catalog, view) = fixture.into_parts();
        let site = catalog.site_course()?;

        let navigation = match NavigationBuilder::new(&catalog, &settings, &view).build() {
            Ok(navigation) => navigation,
            Err(err) => {
                // A partially empty tree is acceptable output; a hard
                // build failure is not, and degrades to one message.
                tracing::error!("navigation build failed: {err}");
                eprintln!("navigation unavailable");
                return Ok(ExitCode::FAILURE);
            }
        };

        let mut tree = navigation.tree;
        trim_tree(
            &mut tree,
            settings.trim_mode,
            settings.trim_length,
            settings.short_trim_length(),
        );

        print!("{}", render_tree(&tree, &settings));

        if self.expandable {
            let expandable = find_expandable(&tree, settings.expansion_limit, site.id);
            println!("{}", serde_json::to_string_pretty(&expandable)?);
        }

        Ok(ExitCode::SUCCESS)
    }
}
