//! Example: Run each lookup against the live sites and display results
//!
//! Run with: cargo run -p mvnkit --example lookup
//!
//! Requests are paced, so this takes a while.

use mvnkit::{FetchError, MvnClient};

/// Lookup case definition
struct LookupCase {
    description: &'static str,
    group_id: &'static str,
    artifact_id: &'static str,
    version: &'static str,
}

const CASES: &[LookupCase] = &[
    LookupCase {
        description: "Jackson databind",
        group_id: "com.fasterxml.jackson.core",
        artifact_id: "jackson-databind",
        version: "2.17.0",
    },
    LookupCase {
        description: "Guava",
        group_id: "com.google.guava",
        artifact_id: "guava",
        version: "33.0.0-jre",
    },
];

#[tokio::main]
async fn main() {
    println!("MvnKit Lookup Examples");
    println!("======================\n");

    let client = match MvnClient::new() {
        Ok(client) => client,
        Err(e) => {
            println!("Client error: {}", e);
            std::process::exit(1);
        }
    };

    let mut failed = 0;

    for (i, case) in CASES.iter().enumerate() {
        println!("{}. {}", i + 1, case.description);
        if let Err(e) = run_case(&client, case).await {
            println!("   Error: {}", e);
            println!("   ✗ FAIL\n");
            failed += 1;
        } else {
            println!("   ✓ PASS\n");
        }
    }

    println!("======================");
    println!("Results: {} passed, {} failed", CASES.len() - failed, failed);

    if failed > 0 {
        std::process::exit(1);
    }
}

async fn run_case(client: &MvnClient, case: &LookupCase) -> Result<(), FetchError> {
    let outcome = client.search_artifacts(case.artifact_id, 3).await?;
    println!("   Search: {} result(s)", outcome.total_results);
    for artifact in &outcome.artifacts {
        println!("     {}:{}", artifact.group_id, artifact.artifact_id);
    }

    let latest = client
        .latest_artifact(case.group_id, case.artifact_id)
        .await?;
    match latest {
        Some(entry) => println!("   Latest: {}", entry.version),
        None => println!("   Latest: (no versions listed)"),
    }

    let pom = client
        .manifest(case.group_id, case.artifact_id, case.version)
        .await?;
    println!("   POM: {} bytes", pom.len());

    let snippets = client
        .dependency_snippets(case.group_id, case.artifact_id, case.version)
        .await?;
    let gradle = snippets.gradle.replace('\n', " ");
    println!("   Gradle: {}", gradle);

    Ok(())
}
