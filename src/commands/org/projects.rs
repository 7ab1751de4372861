//! Create configured classic project boards and their columns.

use crate::infra::github::GitHubApi;
use crate::shared::config::ProjectSpec;
use std::collections::BTreeMap;

use super::error::Result;

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ProjectSetup {
    pub created: Vec<String>,
    pub existing: Vec<String>,
    pub columns: usize,
    pub failures: usize,
}

pub(crate) async fn setup_projects(
    client: &dyn GitHubApi,
    org: &str,
    projects: &BTreeMap<String, ProjectSpec>,
) -> Result<ProjectSetup> {
    println!("📋 Setting up projects...\n");
    let names: Vec<String> = client
        .list_projects(org)
        .await?
        .into_iter()
        .map(|p| p.name)
        .collect();

    let mut setup = ProjectSetup::default();
    for (name, spec) in projects {
        if names.contains(name) {
            println!("✅ Project {name} already exists");
            setup.existing.push(name.clone());
            continue;
        }

        println!("🆕 Creating project {name}...");
        let project = match client.create_project(org, name, &spec.description).await {
            Ok(project) => project,
            Err(e) => {
                println!("   ⚠️  Could not create project {name}: {e}");
                tracing::warn!(org, name, error = %e, "project creation failed");
                setup.failures += 1;
                continue;
            }
        };
        setup.created.push(name.clone());

        for column in &spec.columns {
            match client.create_project_column(project.id, column).await {
                Ok(_) => {
                    println!("   ✅ Created column: {column}");
                    setup.columns += 1;
                }
                Err(e) => {
                    println!("   ⚠️  Could not create column {column}: {e}");
                    tracing::warn!(project_id = project.id, column, error = %e, "column creation failed");
                    setup.failures += 1;
                }
            }
        }
    }

    tracing::info!(
        org,
        created = setup.created.len(),
        existing = setup.existing.len(),
        columns = setup.columns,
        failures = setup.failures,
        "project setup finished"
    );
    println!("\n✅ Project setup complete!");
    Ok(setup)
}
