use anyhow::Result;
use clap::Parser;
use covid_dash::app::App;
use covid_dash::stats::{self, Metric};
use covid_dash::{data, map, ui};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use std::time::Duration;

/// Terminal COVID-19 dashboard: choropleth map and ranked bar charts
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Daily case/death records CSV (CDC surveillance export)
    #[arg(long, default_value = "data/covid_data.csv")]
    covid: PathBuf,

    /// Census population CSV (state name + 2020 column)
    #[arg(long, default_value = "data/census_usa.csv")]
    census: PathBuf,

    /// State outline GeoJSON (FeatureCollection of named polygons)
    #[arg(long, default_value = "data/us_states.geojson")]
    geo: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load everything before taking over the terminal so errors stay readable
    let records = data::load_daily_records(&args.covid)?;
    let populations = data::load_population(&args.census)?;
    let shapes = match data::load_state_shapes(&args.geo) {
        Ok(shapes) => shapes,
        Err(e) => {
            eprintln!("Warning: no map outlines ({e:#}); showing charts only");
            Vec::new()
        }
    };

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture for the hover detail panel
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, records, populations, shapes);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

fn run(
    terminal: &mut DefaultTerminal,
    records: Vec<stats::DailyRecord>,
    populations: Vec<stats::PopulationRecord>,
    shapes: Vec<map::StateShape>,
) -> Result<()> {
    let mut app = App::new(records, populations, shapes);

    // Main loop
    loop {
        // Draw
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                            // Direct metric selection
                            KeyCode::Char('1') => app.set_metric(Metric::Population),
                            KeyCode::Char('2') => app.set_metric(Metric::AbsCases),
                            KeyCode::Char('3') => app.set_metric(Metric::AbsDeaths),
                            KeyCode::Char('4') => app.set_metric(Metric::RelCases),
                            KeyCode::Char('5') => app.set_metric(Metric::RelDeaths),

                            // Cycle metric
                            KeyCode::Char('m') | KeyCode::Tab => app.next_metric(),
                            KeyCode::Char('M') => app.prev_metric(),

                            // Date range filter
                            KeyCode::Char('f') => app.toggle_filter(),
                            KeyCode::Char('[') => app.step_start(false),
                            KeyCode::Char(']') => app.step_start(true),
                            KeyCode::Char('{') => app.step_end(false),
                            KeyCode::Char('}') => app.step_end(true),
                            KeyCode::Char('c') => app.clear_filter(),

                            // Reset selection
                            KeyCode::Char('r') | KeyCode::Char('0') => app.reset(),

                            _ => {}
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    // Track position for the hover detail panel
                    app.set_mouse_pos(mouse.column, mouse.row);
                }
                // Resize is picked up on the next draw
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
