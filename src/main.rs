use clap::Clap;
use console::Style;
use emufe::sysout::ScanReporterSysOut;
use emufe::EmuFe;
use env_logger::{Builder, Env, Target};

use anyhow::Result;

#[derive(Clap)]
#[clap(version = "0.1", about = "Portable emulator front-end core: scans ROM libraries and launches games")]
struct Opts {
    #[clap(subcommand)]
    subcmd: SubCommand,
}

#[derive(Clap)]
enum SubCommand {
    #[clap(about = "Scans every system's ROM folder and saves the library snapshot")]
    Scan(Scan),
    #[clap(about = "Lists the systems in the catalog with their game counts")]
    Systems(Systems),
    #[clap(about = "Lists the games found for one system")]
    List(List),
    #[clap(about = "Launches a game through the emulator")]
    Launch(Launch),
    #[clap(about = "Lists the emulator cores installed on disk")]
    Cores(Cores),
    #[clap(about = "Prints the portable package directory layout")]
    Paths(Paths),
}

#[derive(Clap)]
struct Scan {
    #[clap(short, long, about = "Base directory of the portable package. Defaults to the current directory.")]
    base: Option<String>,
    #[clap(short, long, about = "JSON catalog file replacing the builtin system table.")]
    catalog: Option<String>,
}

#[derive(Clap)]
struct Systems {
    #[clap(short, long, about = "Base directory of the portable package. Defaults to the current directory.")]
    base: Option<String>,
    #[clap(short, long, about = "JSON catalog file replacing the builtin system table.")]
    catalog: Option<String>,
}

#[derive(Clap)]
struct List {
    #[clap(short, long, about = "Base directory of the portable package. Defaults to the current directory.")]
    base: Option<String>,
    #[clap(short, long, about = "JSON catalog file replacing the builtin system table.")]
    catalog: Option<String>,
    #[clap(short, long, about = "The system to list, e.g. `snes`.")]
    system: String,
}

#[derive(Clap)]
struct Launch {
    #[clap(short, long, about = "Base directory of the portable package. Defaults to the current directory.")]
    base: Option<String>,
    #[clap(short, long, about = "JSON catalog file replacing the builtin system table.")]
    catalog: Option<String>,
    #[clap(short, long, about = "The system of the game, e.g. `snes`.")]
    system: String,
    #[clap(short, long, about = "The game to launch, by title or file name.")]
    game: String,
}

#[derive(Clap)]
struct Cores {
    #[clap(short, long, about = "Base directory of the portable package. Defaults to the current directory.")]
    base: Option<String>,
}

#[derive(Clap)]
struct Paths {
    #[clap(short, long, about = "Base directory of the portable package. Defaults to the current directory.")]
    base: Option<String>,
}

fn main() {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    builder.target(Target::Stdout);
    builder.init();
    let opts: Opts = Opts::parse();

    let result = match opts.subcmd {
        SubCommand::Scan(cmd) => scan(cmd),
        SubCommand::Systems(cmd) => systems(cmd),
        SubCommand::List(cmd) => list(cmd),
        SubCommand::Launch(cmd) => launch(cmd),
        SubCommand::Cores(cmd) => cores(cmd),
        SubCommand::Paths(cmd) => paths(cmd),
    };

    if let Err(e) = result {
        println!("{} {}", Style::new().red().apply_to("ERROR"), e);
        std::process::exit(1);
    }
}

fn front_end(base: Option<String>, catalog: Option<String>) -> Result<EmuFe> {
    let base = base.unwrap_or_else(|| String::from("."));
    match catalog {
        Some(file) => EmuFe::with_catalog_file(base, &file),
        None => EmuFe::new(base),
    }
}

fn scan(cmd: Scan) -> Result<()> {
    let fe = front_end(cmd.base, cmd.catalog)?;
    let reporter = ScanReporterSysOut::new(fe.catalog().len() as u64);
    let snapshot = fe.refresh_with(&reporter);
    fe.save_cache()?;

    println!("Scanned {} systems, {} games:",
        Style::new().bold().apply_to(fe.catalog().len()),
        Style::new().bold().apply_to(snapshot.total_games()));
    for system in fe.catalog().all() {
        println!("  {} {}",
            Style::new().green().apply_to(&system.id),
            snapshot.count_for(&system.id));
    }
    for warning in &snapshot.warnings {
        println!("{} {}: {}",
            Style::new().yellow().apply_to("WARNING"),
            warning.system_id, warning.message);
    }

    Ok(())
}

fn systems(cmd: Systems) -> Result<()> {
    let fe = front_end(cmd.base, cmd.catalog)?;
    let snapshot = fe.load_or_refresh();

    println!("Library from {}, {} games total",
        snapshot.scanned_at.format("%Y-%m-%d %H:%M:%S"),
        snapshot.total_games());
    let counts = fe.counts();
    for system in fe.catalog().all() {
        println!("{} {} ({} games, core {})",
            Style::new().green().bold().apply_to(&system.id),
            system.full_name,
            counts.get(&system.id).copied().unwrap_or(0),
            system.core);
    }

    Ok(())
}

fn list(cmd: List) -> Result<()> {
    let fe = front_end(cmd.base, cmd.catalog)?;
    fe.load_or_refresh();

    let games = fe.games(&cmd.system)?;
    if games.is_empty() {
        if let Some(system) = fe.catalog().lookup(&cmd.system) {
            println!("No games found for `{}`, drop ROM files into {}",
                cmd.system,
                fe.paths().system_rom_dir(&system.folder).display());
        }
        return Ok(());
    }

    for game in games {
        println!("{} {}",
            Style::new().cyan().apply_to(&game.title),
            Style::new().dim().apply_to(&game.file_name));
    }

    Ok(())
}

fn launch(cmd: Launch) -> Result<()> {
    let fe = front_end(cmd.base, cmd.catalog)?;
    fe.load_or_refresh();

    let game = fe.find_game(&cmd.system, &cmd.game)?;
    println!("Launching {}", Style::new().green().bold().apply_to(&game.title));
    fe.launch(&game)?;

    Ok(())
}

fn cores(cmd: Cores) -> Result<()> {
    let fe = front_end(cmd.base, None)?;

    let emulator = fe.paths().emulator_exe();
    if emulator.exists() {
        println!("Emulator: {}", emulator.display());
    } else {
        println!("{} emulator missing, expected at {}",
            Style::new().yellow().apply_to("WARNING"),
            emulator.display());
    }

    let cores = fe.installed_cores();
    if cores.is_empty() {
        println!("No cores installed in {}", fe.paths().cores_dir().display());
    }
    for core in cores {
        println!("  {}", core);
    }

    Ok(())
}

fn paths(cmd: Paths) -> Result<()> {
    let fe = front_end(cmd.base, None)?;
    let paths = fe.paths();

    println!("Base:        {}", paths.base().display());
    println!("Emulator:    {}", paths.emulator_exe().display());
    println!("Cores:       {}", paths.cores_dir().display());
    println!("BIOS:        {}", paths.bios_dir().display());
    println!("ROMs:        {}", paths.rom_root().display());
    println!("Saves:       {}", paths.saves_dir().display());
    println!("States:      {}", paths.states_dir().display());
    println!("Screenshots: {}", paths.screenshots_dir().display());
    println!("Cache:       {}", paths.snapshot_cache().display());

    Ok(())
}
