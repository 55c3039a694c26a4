//! Subcommand definitions and handlers.

use crate::output::{render_key_values, render_table, truncate, CmdResult, Printer};
use clap::{Args, Subcommand};
use maia_client::{
    Client, CreateMemoryInput, CreateNamespaceInput, GetContextInput, ListOptions, Memory,
    MemoryType, Namespace, NamespaceConfig, RecallOptions, SearchMemoriesInput, UpdateMemoryInput,
    UpdateNamespaceInput,
};

const CONTENT_WIDTH: usize = 60;

#[derive(Subcommand)]
pub enum MemoryCommand {
    /// Create a new memory
    Create {
        /// Namespace for the memory
        #[arg(short, long, default_value = "default")]
        namespace: String,
        /// Memory content
        #[arg(short, long)]
        content: String,
        /// Memory type (semantic, episodic, working)
        #[arg(short = 't', long = "type", default_value = "semantic")]
        memory_type: MemoryType,
        /// Tags (comma-separated)
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        /// Confidence score (0.0-1.0)
        #[arg(long, default_value = "1.0")]
        confidence: f64,
    },
    /// Get a memory by ID
    Get { id: String },
    /// Update the content, tags or confidence of a memory
    Update {
        id: String,
        #[arg(short, long)]
        content: Option<String>,
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
        #[arg(long)]
        confidence: Option<f64>,
    },
    /// Delete a memory
    #[command(visible_alias = "rm")]
    Delete { id: String },
    /// List memories in a namespace
    #[command(visible_alias = "ls")]
    List {
        #[arg(short, long, default_value = "default")]
        namespace: String,
        #[arg(short, long, default_value = "20")]
        limit: u32,
        #[arg(short, long, default_value = "0")]
        offset: u32,
    },
    /// Search memories
    Search {
        #[arg(short, long)]
        query: Option<String>,
        #[arg(short, long)]
        namespace: Option<String>,
        /// Filter by memory type
        #[arg(short = 't', long = "type")]
        memory_type: Option<MemoryType>,
        #[arg(short, long, default_value = "20")]
        limit: u32,
        #[arg(short, long, default_value = "0")]
        offset: u32,
    },
}

#[derive(Subcommand)]
pub enum NamespaceCommand {
    /// Create a namespace
    Create {
        name: String,
        #[arg(long)]
        parent: Option<String>,
        #[arg(long)]
        template: Option<String>,
        #[arg(long)]
        token_budget: Option<u32>,
    },
    /// Get a namespace by ID or name
    Get { id_or_name: String },
    /// Update a namespace's configuration
    Update {
        id: String,
        #[arg(long)]
        token_budget: Option<u32>,
        #[arg(long)]
        max_memories: Option<u64>,
        #[arg(long)]
        retention_days: Option<u32>,
    },
    /// Delete a namespace
    #[command(visible_alias = "rm")]
    Delete { id: String },
    /// List namespaces
    #[command(visible_alias = "ls")]
    List {
        #[arg(short, long)]
        limit: Option<u32>,
        #[arg(short, long)]
        offset: Option<u32>,
    },
}

#[derive(Args)]
pub struct ContextArgs {
    /// Query to assemble context for
    query: String,
    #[arg(short, long)]
    namespace: Option<String>,
    /// Token budget for the assembled context
    #[arg(short, long)]
    budget: Option<u32>,
    #[arg(long)]
    system_prompt: Option<String>,
    #[arg(long)]
    min_score: Option<f64>,
    /// Include relevance scores
    #[arg(long)]
    scores: bool,
}

pub async fn health(client: &Client, out: &Printer) -> CmdResult {
    let health = client.health().await?;
    out.emit(&health, || {
        println!("{} ({})", health.status, health.service)
    })
}

pub async fn stats(client: &Client, out: &Printer) -> CmdResult {
    let stats = client.stats().await?;
    out.emit(&stats, || {
        println!(
            "{}",
            render_key_values(&[
                ("Memories", stats.total_memories.to_string()),
                ("Namespaces", stats.total_namespaces.to_string()),
                ("Storage", format_bytes(stats.storage_size_bytes)),
                ("Last compaction", stats.last_compaction.to_rfc3339()),
            ])
        )
    })
}

pub async fn memory(client: &Client, out: &Printer, cmd: MemoryCommand) -> CmdResult {
    match cmd {
        MemoryCommand::Create {
            namespace,
            content,
            memory_type,
            tags,
            confidence,
        } => {
            let mut input = CreateMemoryInput::new(namespace, content)
                .memory_type(memory_type)
                .confidence(confidence);
            if !tags.is_empty() {
                input = input.tags(tags);
            }
            let mem = client.create_memory(&input).await?;
            out.emit(&mem, || {
                println!("Created memory: {}", mem.id);
                println!("{}", memory_summary(&mem));
            })
        }
        MemoryCommand::Get { id } => {
            let mem = client.get_memory(&id).await?;
            out.emit(&mem, || println!("{}", memory_details(&mem)))
        }
        MemoryCommand::Update {
            id,
            content,
            tags,
            confidence,
        } => {
            let input = UpdateMemoryInput {
                content,
                tags,
                confidence,
                metadata: None,
            };
            let mem = client.update_memory(&id, &input).await?;
            out.emit(&mem, || {
                println!("Updated memory: {}", mem.id);
                println!("{}", memory_summary(&mem));
            })
        }
        MemoryCommand::Delete { id } => {
            client.delete_memory(&id).await?;
            out.done(&format!("Deleted memory: {}", id))
        }
        MemoryCommand::List {
            namespace,
            limit,
            offset,
        } => {
            let opts = ListOptions::new().limit(limit).offset(offset);
            let page = client
                .list_namespace_memories(&namespace, Some(&opts))
                .await?;
            out.emit(&page, || {
                if page.is_empty() {
                    println!("No memories found.");
                    return;
                }
                let rows: Vec<Vec<String>> = page.iter().map(memory_row).collect();
                println!(
                    "{}",
                    render_table(&["ID", "TYPE", "CONTENT", "ACCESSED"], &rows)
                );
                println!("\nShowing {} of {} memories", page.data.len(), page.count);
            })
        }
        MemoryCommand::Search {
            query,
            namespace,
            memory_type,
            limit,
            offset,
        } => {
            let input = SearchMemoriesInput {
                query,
                namespace,
                types: memory_type.map(|t| vec![t]),
                tags: None,
                limit: Some(limit),
                offset: Some(offset),
            };
            let page = client.search_memories(Some(&input)).await?;
            out.emit(&page, || {
                if page.is_empty() {
                    println!("No memories found.");
                    return;
                }
                let rows: Vec<Vec<String>> = page
                    .iter()
                    .map(|r| {
                        vec![
                            r.memory.id.clone(),
                            format!("{:.3}", r.score),
                            r.memory.memory_type.to_string(),
                            truncate(&r.memory.content, CONTENT_WIDTH),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    render_table(&["ID", "SCORE", "TYPE", "CONTENT"], &rows)
                );
            })
        }
    }
}

pub async fn namespace(client: &Client, out: &Printer, cmd: NamespaceCommand) -> CmdResult {
    match cmd {
        NamespaceCommand::Create {
            name,
            parent,
            template,
            token_budget,
        } => {
            let input = CreateNamespaceInput {
                name,
                parent,
                template,
                config: token_budget.map(|b| NamespaceConfig {
                    token_budget: Some(b),
                    ..Default::default()
                }),
            };
            let ns = client.create_namespace(&input).await?;
            out.emit(&ns, || {
                println!("Created namespace: {} ({})", ns.name, ns.id)
            })
        }
        NamespaceCommand::Get { id_or_name } => {
            let ns = client.get_namespace(&id_or_name).await?;
            out.emit(&ns, || println!("{}", namespace_details(&ns)))
        }
        NamespaceCommand::Update {
            id,
            token_budget,
            max_memories,
            retention_days,
        } => {
            let input = UpdateNamespaceInput {
                config: NamespaceConfig {
                    token_budget,
                    max_memories,
                    retention_days,
                    ..Default::default()
                },
            };
            let ns = client.update_namespace(&id, &input).await?;
            out.emit(&ns, || println!("Updated namespace: {} ({})", ns.name, ns.id))
        }
        NamespaceCommand::Delete { id } => {
            client.delete_namespace(&id).await?;
            out.done(&format!("Deleted namespace: {}", id))
        }
        NamespaceCommand::List { limit, offset } => {
            let opts = ListOptions { limit, offset };
            let page = client.list_namespaces(Some(&opts)).await?;
            out.emit(&page, || {
                if page.is_empty() {
                    println!("No namespaces found.");
                    return;
                }
                let rows: Vec<Vec<String>> = page
                    .iter()
                    .map(|ns| {
                        vec![
                            ns.id.clone(),
                            ns.name.clone(),
                            ns.parent.clone().unwrap_or_else(|| "-".into()),
                            ns.config
                                .token_budget
                                .map(|b| b.to_string())
                                .unwrap_or_else(|| "-".into()),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    render_table(&["ID", "NAME", "PARENT", "TOKEN BUDGET"], &rows)
                );
            })
        }
    }
}

pub async fn context(client: &Client, out: &Printer, args: ContextArgs) -> CmdResult {
    let opts = RecallOptions {
        namespace: args.namespace,
        token_budget: args.budget,
        system_prompt: args.system_prompt,
        min_score: args.min_score,
        include_scores: args.scores.then_some(true),
    };
    let ctx = client
        .get_context(&GetContextInput::new(args.query).with_options(opts))
        .await?;
    out.emit(&ctx, || {
        println!("{}", ctx.content);
        println!();
        let mut pairs = vec![
            (
                "Tokens",
                format!("{} / {}", ctx.token_count, ctx.token_budget),
            ),
            ("Memories", ctx.memories.len().to_string()),
            ("Truncated", ctx.truncated.to_string()),
            ("Query time", ctx.query_time.clone()),
        ];
        if let Some(zones) = &ctx.zone_stats {
            for (name, zone) in [
                ("Critical", zones.critical()),
                ("Middle", zones.middle()),
                ("Recency", zones.recency()),
            ] {
                pairs.push((name, format!("{} / {}", zone.used, zone.budget)));
            }
        }
        println!("{}", render_key_values(&pairs));
    })
}

fn memory_row(mem: &Memory) -> Vec<String> {
    vec![
        mem.id.clone(),
        mem.memory_type.to_string(),
        truncate(&mem.content, CONTENT_WIDTH),
        mem.accessed_at.format("%Y-%m-%d %H:%M").to_string(),
    ]
}

fn memory_summary(mem: &Memory) -> String {
    render_key_values(&[
        ("Namespace", mem.namespace.clone()),
        ("Type", mem.memory_type.to_string()),
        ("Content", truncate(&mem.content, CONTENT_WIDTH)),
    ])
}

fn memory_details(mem: &Memory) -> String {
    let mut pairs = vec![
        ("ID", mem.id.clone()),
        ("Namespace", mem.namespace.clone()),
        ("Type", mem.memory_type.to_string()),
        ("Source", mem.source.to_string()),
        ("Confidence", format!("{:.2}", mem.confidence)),
        ("Access count", mem.access_count.to_string()),
        ("Created", mem.created_at.to_rfc3339()),
        ("Updated", mem.updated_at.to_rfc3339()),
    ];
    if let Some(tags) = &mem.tags {
        pairs.push(("Tags", tags.join(", ")));
    }
    pairs.push(("Content", mem.content.clone()));
    render_key_values(&pairs)
}

fn namespace_details(ns: &Namespace) -> String {
    let opt = |v: Option<String>| v.unwrap_or_else(|| "-".into());
    render_key_values(&[
        ("ID", ns.id.clone()),
        ("Name", ns.name.clone()),
        ("Parent", opt(ns.parent.clone())),
        ("Template", opt(ns.template.clone())),
        (
            "Token budget",
            opt(ns.config.token_budget.map(|v| v.to_string())),
        ),
        (
            "Max memories",
            opt(ns.config.max_memories.map(|v| v.to_string())),
        ),
        (
            "Retention days",
            opt(ns.config.retention_days.map(|v| v.to_string())),
        ),
        ("Inherit", ns.config.inherit_from_parent.to_string()),
        ("Created", ns.created_at.to_rfc3339()),
    ])
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
