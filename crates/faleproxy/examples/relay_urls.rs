//! Example: Relay a few live pages and summarize the rewrites
//!
//! Run with: cargo run -p faleproxy --example relay_urls
//!
//! Needs network access.

use faleproxy::{rewrite_url, RelayResponse};

struct Case {
    url: &'static str,
    description: &'static str,
    expect_title: Option<&'static str>,
    expect_replacements: bool,
}

const CASES: &[Case] = &[
    Case {
        url: "https://www.yale.edu/",
        description: "University home page",
        expect_title: Some("Fale"),
        expect_replacements: true,
    },
    Case {
        url: "https://example.com",
        description: "Page without matches",
        expect_title: Some("Example Domain"),
        expect_replacements: false,
    },
];

#[tokio::main]
async fn main() {
    println!("Faleproxy Relay Examples");
    println!("========================\n");

    let mut passed = 0;
    let mut failed = 0;

    for (i, case) in CASES.iter().enumerate() {
        println!("{}. {}", i + 1, case.description);
        println!("   URL: {}", case.url);

        match rewrite_url(case.url).await {
            Ok(response) => {
                print_summary(&response);
                if check(case, &response) {
                    println!("   ✓ PASS\n");
                    passed += 1;
                } else {
                    println!("   ✗ FAIL (expectations not met)\n");
                    failed += 1;
                }
            }
            Err(e) => {
                println!("   Error: {}", e);
                println!("   ✗ FAIL\n");
                failed += 1;
            }
        }
    }

    println!("========================");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed > 0 {
        std::process::exit(1);
    }
}

fn print_summary(response: &RelayResponse) {
    println!("   Title: {}", response.title);
    println!("   Replacements: {}", response.replacement_count);
    println!("   Size: {} bytes", response.content.len());
}

fn check(case: &Case, response: &RelayResponse) -> bool {
    if let Some(expected) = case.expect_title {
        if !response.title.contains(expected) {
            println!("   Expected title to contain '{}'", expected);
            return false;
        }
    }

    if case.expect_replacements != (response.replacement_count > 0) {
        println!(
            "   Unexpected replacement count {}",
            response.replacement_count
        );
        return false;
    }

    true
}
