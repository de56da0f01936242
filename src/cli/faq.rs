//! FAQ CLI commands
//!
//! Implements CLI commands for FAQ entry management within one environment.

use clap::{Args, Subcommand};

use crate::display::faq::{format_category_list, format_faq_details, format_faq_list, format_stats};
use crate::error::{FaqStoreError, FaqStoreResult};
use crate::models::{FaqEntryPatch, FaqId, NewFaqEntry};
use crate::store::FaqStore;

/// FAQ commands, scoped to one environment
#[derive(Args)]
pub struct FaqArgs {
    /// Environment name (e.g. stunting, ppid)
    #[arg(short, long, env = "FAQSTORE_ENV")]
    pub env: String,

    #[command(subcommand)]
    pub command: FaqCommands,
}

/// FAQ subcommands
#[derive(Subcommand)]
pub enum FaqCommands {
    /// List FAQ entries
    List {
        /// Only entries in this category
        #[arg(short, long)]
        category: Option<String>,
        /// Print the entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one entry
    Show {
        /// Entry ID
        id: String,
    },

    /// Create a new entry
    #[command(alias = "add")]
    Create {
        /// Question phrasing (repeat for alternatives)
        #[arg(short = 'q', long = "question", required = true)]
        questions: Vec<String>,
        /// Answer text
        #[arg(short, long)]
        answer: String,
        /// Category
        #[arg(short, long)]
        category: Option<String>,
        /// Links, as a JSON value
        #[arg(long)]
        links: Option<String>,
    },

    /// Edit an entry; only the given fields change
    Edit {
        /// Entry ID
        id: String,
        /// Replace all question phrasings (repeatable)
        #[arg(short = 'q', long = "question")]
        questions: Vec<String>,
        /// New answer
        #[arg(short, long)]
        answer: Option<String>,
        /// New category
        #[arg(short, long, conflicts_with = "clear_category")]
        category: Option<String>,
        /// Remove the category
        #[arg(long)]
        clear_category: bool,
        /// New links, as a JSON value
        #[arg(long, conflicts_with = "clear_links")]
        links: Option<String>,
        /// Remove the links
        #[arg(long)]
        clear_links: bool,
    },

    /// Delete an entry
    Delete {
        /// Entry ID
        id: String,
    },

    /// List the distinct categories in use
    Categories,

    /// Show file statistics
    Stats,
}

/// Handle a FAQ command
pub fn handle_faq_command(store: &FaqStore, args: FaqArgs) -> FaqStoreResult<()> {
    let env = store.environment(&args.env)?;
    let faqs = store.faqs(&env)?;

    match args.command {
        FaqCommands::List { category, json } => {
            let mut entries = faqs.list()?;
            if let Some(category) = &category {
                entries.retain(|e| e.category.as_deref() == Some(category.as_str()));
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print!("{}", format_faq_list(&env, &entries));
            }
        }

        FaqCommands::Show { id } => {
            let entry = faqs.get(&FaqId::from(id.as_str()))?;
            print!("{}", format_faq_details(&entry));
        }

        FaqCommands::Create {
            questions,
            answer,
            category,
            links,
        } => {
            let new = NewFaqEntry {
                questions,
                answer,
                category,
                links: links.as_deref().map(parse_links).transpose()?,
            };
            let entry = faqs.create(new)?;

            println!("Created FAQ in '{}': {}", env, entry.primary_question());
            println!("  ID: {}", entry.id);
        }

        FaqCommands::Edit {
            id,
            questions,
            answer,
            category,
            clear_category,
            links,
            clear_links,
        } => {
            let patch = FaqEntryPatch {
                questions: (!questions.is_empty()).then_some(questions),
                answer,
                category: if clear_category {
                    Some(None)
                } else {
                    category.map(Some)
                },
                links: if clear_links {
                    Some(None)
                } else {
                    links.as_deref().map(parse_links).transpose()?.map(Some)
                },
            };

            if patch.is_empty() {
                println!("Nothing to change. Use --help to see editable fields.");
                return Ok(());
            }

            let entry = faqs.update(&FaqId::from(id.as_str()), patch)?;
            println!("Updated FAQ {} in '{}'", entry.id, env);
        }

        FaqCommands::Delete { id } => {
            faqs.delete(&FaqId::from(id.as_str()))?;
            println!("Deleted FAQ {} from '{}'", id, env);
        }

        FaqCommands::Categories => {
            print!("{}", format_category_list(&env, &faqs.categories()?));
        }

        FaqCommands::Stats => {
            print!("{}", format_stats(&store.documents().stats(&env)?));
        }
    }

    Ok(())
}

fn parse_links(raw: &str) -> FaqStoreResult<serde_json::Value> {
    serde_json::from_str(raw)
        .map_err(|e| FaqStoreError::Validation(format!("Invalid links JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_links() {
        let value = parse_links(r#"[{"url": "https://example.org"}]"#).unwrap();
        assert!(value.is_array());
        assert!(parse_links("not json").unwrap_err().is_validation());
    }
}
