use std::collections::HashMap;

use fastrace::collector::{Reporter, SpanRecord};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionStats {
    pub name: String,
    pub calls: u32,
    pub total_us: u64,
    pub max_us: u64,
}

/// Writes one log line per traced function every time fastrace flushes.
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, spans: Vec<SpanRecord>) {
        let stats = aggregate(spans.iter().map(|s| (s.name.as_ref(), s.duration_ns)));
        for stat in stats {
            info!(
                target: "rota::profile",
                "{:<24} calls={:<5} total={}us max={}us",
                stat.name,
                stat.calls,
                stat.total_us,
                stat.max_us
            );
        }
    }
}

fn simplify_name(name: &str) -> String {
    let name = name.replace("::{{closure}}", "");
    match name.rfind("::") {
        Some(pos) => name[pos + 2..].to_string(),
        None => name,
    }
}

/// Groups `(span name, duration in ns)` pairs by function, slowest total first.
pub fn aggregate<'a>(spans: impl IntoIterator<Item = (&'a str, u64)>) -> Vec<FunctionStats> {
    let mut by_name: HashMap<String, FunctionStats> = HashMap::new();

    for (name, duration_ns) in spans {
        let name = simplify_name(name);
        let us = duration_ns / 1000;
        let stats = by_name.entry(name.clone()).or_insert(FunctionStats {
            name,
            calls: 0,
            total_us: 0,
            max_us: 0,
        });
        stats.calls += 1;
        stats.total_us += us;
        stats.max_us = stats.max_us.max(us);
    }

    let mut stats: Vec<FunctionStats> = by_name.into_values().collect();
    stats.sort_by(|a, b| b.total_us.cmp(&a.total_us).then_with(|| a.name.cmp(&b.name)));
    stats
}
