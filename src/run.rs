/// One invocation: query → build → resolve → render.
///
/// The stages run strictly in order; the first failure aborts the rest and
/// surfaces a single classified error. Warnings accumulated by the build are
/// printed to stderr and never affect the exit code.
use crate::cli::args::Cli;
use crate::cli::output::{self, OutputCtx};
use crate::device::{DeviceQuery, DiskutilQuery};
use crate::errors::RunError;
use crate::render::{self, Column, OutputFormat, RenderRequest, parse_columns};
use crate::topology::{self, ResolveOptions, Topology};

/// Run one listing against the live OS.
///
/// # Errors
///
/// Returns `RunError` on any pipeline failure.
pub fn run(cli: &Cli) -> Result<(), RunError> {
    let query = DiskutilQuery::default();
    let text = execute(cli, &query)?;
    print!("{text}");
    Ok(())
}

/// The full pipeline against any device source, returning the rendered text.
///
/// # Errors
///
/// Returns `RunError` on any pipeline failure.
pub fn execute(cli: &Cli, query: &dyn DeviceQuery) -> Result<String, RunError> {
    let ctx = OutputCtx::new(cli.debug);

    // Boundary validation happens before any device query, so a bad column
    // or format never touches the OS.
    let request = build_request(cli)?;
    let opts = ResolveOptions {
        bytes: cli.bytes,
        paths: cli.paths,
    };

    let facts = {
        let _t = ctx.timer("query");
        query.list_device_facts()?
    };
    let topology = {
        let _t = ctx.timer("build");
        topology::build(facts)?
    };
    output::write_warnings(&topology.warnings);
    let topology = filter_disks(topology, cli);

    let fields = {
        let _t = ctx.timer("resolve");
        topology::resolve(&topology, opts)
    };
    let _t = ctx.timer("render");
    Ok(render::render(&topology, &fields, &request)?)
}

fn build_request(cli: &Cli) -> Result<RenderRequest, RunError> {
    let columns = if let Some(list) = &cli.output {
        parse_columns(list)?
    } else if cli.fs {
        Column::FS.to_vec()
    } else {
        Column::DEFAULT.to_vec()
    };
    let format = if cli.json {
        OutputFormat::Json
    } else {
        cli.format.parse()?
    };
    let sort = cli.sort.as_deref().map(str::parse::<Column>).transpose()?;

    Ok(RenderRequest {
        columns,
        format,
        sort,
        include_empty: cli.all,
        nodeps: cli.nodeps,
        ascii: cli.ascii,
        no_header: cli.no_headings,
    })
}

/// Apply `--include`/`--exclude` at whole-disk granularity: pruning a root
/// drops its entire subtree, so a kept child can never be orphaned.
fn filter_disks(mut topology: Topology, cli: &Cli) -> Topology {
    let mut roots = std::mem::take(&mut topology.roots);
    let matches = |list: &str, root: usize| {
        let id = &topology.nodes[root].fact.id;
        list.split(',').any(|entry| {
            let entry = entry.trim();
            entry == id || entry.strip_prefix("/dev/") == Some(id.as_str())
        })
    };

    if let Some(list) = &cli.include {
        roots.retain(|&r| matches(list, r));
    } else if let Some(list) = &cli.exclude {
        roots.retain(|&r| !matches(list, r));
    }
    topology.roots = roots;
    topology
}
