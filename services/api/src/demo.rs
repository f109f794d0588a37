use crate::infra::{
    parse_alert_level, parse_datetime, parse_tide, parse_weather, seed_authors,
    InMemoryAlertPublisher, InMemoryReportRepository, BAY_LOCATIONS,
};
use crate::routes::validate_reading;
use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};
use clap::Args;
use jubilee::community::{
    step_toward, AlertEngine, AlertLevel, AlertResult, AuthorId, CommunityAlertService,
    ConditionScoreNotification, Coordinate, Report, ReportId, ReportSubmission, ReportType,
    SubmissionReceipt,
};
use jubilee::conditions::{samples, ConditionScore, EnvironmentalReading, ScoreEngine};
use jubilee::conditions::{TidePhase, WeatherPattern};
use jubilee::config::AppConfig;
use jubilee::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Evaluation time (YYYY-MM-DDTHH:MM). Defaults to now.
    #[arg(long, value_parser = parse_datetime)]
    pub(crate) at: Option<NaiveDateTime>,
    /// Wind speed in m/s
    #[arg(long)]
    pub(crate) wind_speed: f64,
    /// Cardinal wind direction (E, NE, Southwest, ...)
    #[arg(long)]
    pub(crate) wind_direction: String,
    /// Tide phase: rising, high, falling or low
    #[arg(long, value_parser = parse_tide)]
    pub(crate) tide: TidePhase,
    /// Water temperature in °C
    #[arg(long)]
    pub(crate) water_temp: Option<f64>,
    /// Weather pattern: clear, partly-cloudy, overcast or overcast-with-rain
    #[arg(long, value_parser = parse_weather)]
    pub(crate) weather: Option<WeatherPattern>,
    /// Salinity gradient in PSU
    #[arg(long)]
    pub(crate) salinity: Option<f64>,
    /// Air temperature in °C
    #[arg(long)]
    pub(crate) air_temp: Option<f64>,
    /// Print the score as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AlertArgs {
    /// JSON file holding an array of reports
    #[arg(long)]
    pub(crate) reports: PathBuf,
    /// Evaluation time (YYYY-MM-DDTHH:MM). Defaults to now.
    #[arg(long, value_parser = parse_datetime)]
    pub(crate) now: Option<NaiveDateTime>,
    /// Reference latitude for the nearby count
    #[arg(long, requires = "lon")]
    pub(crate) lat: Option<f64>,
    /// Reference longitude for the nearby count
    #[arg(long, requires = "lat")]
    pub(crate) lon: Option<f64>,
    /// Level currently shown to users; prints the one-step transition
    #[arg(long, value_parser = parse_alert_level)]
    pub(crate) shown: Option<AlertLevel>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Season to simulate. Defaults to the current year.
    #[arg(long)]
    pub(crate) year: Option<i32>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        at,
        wind_speed,
        wind_direction,
        tide,
        water_temp,
        weather,
        salinity,
        air_temp,
        json,
    } = args;

    let now = at.unwrap_or_else(|| Local::now().naive_local());
    let mut reading = EnvironmentalReading::new(now, wind_speed, wind_direction, tide);
    reading.water_temperature = water_temp;
    reading.weather_pattern = weather;
    reading.salinity = salinity;
    if let Some(air) = air_temp {
        reading.air_temperature = air;
    }
    validate_reading(&reading)?;

    let score = ScoreEngine::new().score(&reading, now);
    if json {
        println!("{}", serde_json::to_string_pretty(&score)?);
    } else {
        render_score("Condition score", &score);
    }
    Ok(())
}

pub(crate) fn run_alert(args: AlertArgs) -> Result<(), AppError> {
    let AlertArgs {
        reports,
        now,
        lat,
        lon,
        shown,
    } = args;

    let raw = std::fs::read_to_string(&reports)?;
    let reports: Vec<Report> = serde_json::from_str(&raw)?;
    let now = now.unwrap_or_else(|| Local::now().naive_local());
    let reference = match (lat, lon) {
        (Some(latitude), Some(longitude)) => Some(Coordinate::new(latitude, longitude)),
        (None, None) => None,
        _ => {
            return Err(AppError::InvalidInput(
                "--lat and --lon must be given together".to_string(),
            ))
        }
    };

    let engine = AlertEngine::new(AppConfig::load()?.escalation);
    let result = engine.evaluate(&reports, now, reference);
    render_alert(&result);

    if let Some(location) = reference {
        let recent = engine.recent_reports(&reports, now);
        let clustered = engine.has_default_clustering(&location, recent);
        println!("- Clustered near reference: {}", if clustered { "yes" } else { "no" });
    }

    if let Some(current) = shown {
        let transition = step_toward(current, result.level);
        println!(
            "Display transition: {} -> {}{}",
            transition.from.label(),
            transition.to.label(),
            if transition.held_back() {
                " (held back one tier)"
            } else {
                ""
            }
        );
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let year = args.year.unwrap_or_else(|| Local::now().year());

    println!("Jubilee watch demo ({year} season)");
    let typical = samples::typical(year).ok_or_else(|| unsupported_year(year))?;
    let favorable = samples::favorable(year).ok_or_else(|| unsupported_year(year))?;

    let engine = ScoreEngine::new();
    let typical_score = engine.score(&typical, typical.observed_at);
    let favorable_score = engine.score(&favorable, favorable.observed_at);
    render_score("\nTypical July evening", &typical_score);
    render_score("\nFavorable August night", &favorable_score);

    println!("\nSubscriber notifications for the favorable night");
    for author in seed_authors() {
        match ConditionScoreNotification::for_subscriber(
            &author,
            favorable_score.total,
            favorable_score.evaluated_at,
        ) {
            Some(notification) => println!("- {}: {}", author.display_name, notification.body),
            None => println!("- {}: below threshold", author.display_name),
        }
    }

    let base = NaiveDate::from_ymd_opt(year, 8, 15)
        .and_then(|date| date.and_hms_opt(2, 0, 0))
        .ok_or_else(|| unsupported_year(year))?;
    let publisher = Arc::new(InMemoryAlertPublisher::default());
    let service = CommunityAlertService::new(
        Arc::new(InMemoryReportRepository::seeded(seed_authors())),
        publisher.clone(),
        AppConfig::load()?.escalation,
    );

    println!("\nReport stream");
    let receipts = run_report_stream(&service, base)?;
    let mut shown = AlertLevel::None;
    for receipt in &receipts {
        let transition = step_toward(shown, receipt.alert.level);
        shown = transition.to;
        println!(
            "- {} {} at {} by {} | {} | display {}{}",
            receipt.report.reported_at.format("%H:%M"),
            receipt.report.report_type.label(),
            receipt.report.location_name,
            receipt
                .report
                .author
                .as_ref()
                .map(|author| author.display_name.as_str())
                .unwrap_or("anonymous"),
            receipt.alert.summary(),
            transition.to.label(),
            if receipt.notified { " | alert sent" } else { "" },
        );
    }

    println!("\nNotifications published");
    for event in publisher.events() {
        println!(
            "- {} ({:.0} m radius): {}",
            event.title, event.radius_meters, event.body
        );
    }

    println!("\nResolutions");
    for (report_id, verified) in [("demo-3", true), ("demo-1", false)] {
        let update = service.resolve(&ReportId(report_id.to_string()), verified)?;
        println!(
            "- {}: {} -> {} ({}){}",
            update.author_id,
            update.previous,
            update.reputation,
            update.badge().label(),
            if update.promoted {
                " | promoted to verified watcher"
            } else {
                ""
            }
        );
    }

    let now = base + Duration::minutes(20);
    let reports = service.reports()?;
    let recent = service.engine().recent_reports(&reports, now);
    println!("\nClusters at {}", now.format("%H:%M"));
    for (name, location) in BAY_LOCATIONS.iter() {
        let clustered = service
            .engine()
            .has_default_clustering(location, recent.iter().copied());
        let nearby = service.current_alert(now, Some(*location))?.nearby_report_count;
        println!(
            "- {name}: {nearby} nearby{}",
            if clustered { " | clustered" } else { "" }
        );
    }

    Ok(())
}

fn unsupported_year(year: i32) -> AppError {
    AppError::InvalidInput(format!("year {year} is outside the supported calendar range"))
}

fn sighting(
    id: &str,
    report_type: ReportType,
    location: usize,
    author: Option<&str>,
) -> ReportSubmission {
    let (name, coordinate) = BAY_LOCATIONS[location % BAY_LOCATIONS.len()];
    ReportSubmission {
        id: ReportId(id.to_string()),
        report_type,
        location: coordinate,
        location_name: name.to_string(),
        species: vec!["flounder".to_string(), "blue crab".to_string()],
        intensity: Default::default(),
        description: None,
        photo_refs: Vec::new(),
        author_id: author.map(|id| AuthorId(id.to_string())),
    }
}

/// Submits an escalating sequence of sightings five minutes apart.
fn run_report_stream(
    service: &CommunityAlertService<InMemoryReportRepository, InMemoryAlertPublisher>,
    base: NaiveDateTime,
) -> Result<Vec<SubmissionReceipt>, AppError> {
    let stream = [
        sighting("demo-1", ReportType::EarlyWarning, 4, Some("newbie")),
        sighting("demo-2", ReportType::EarlyWarning, 3, None),
        sighting("demo-3", ReportType::FullJubilee, 0, Some("tim-f")),
        sighting("demo-4", ReportType::FullJubilee, 1, Some("captain-lou")),
    ];

    let mut receipts = Vec::with_capacity(stream.len());
    for (offset, submission) in (0_i64..).zip(stream) {
        let at = base + Duration::minutes(offset * 5);
        receipts.push(service.submit(submission, at)?);
    }
    Ok(receipts)
}

fn render_score(title: &str, score: &ConditionScore) {
    println!("{title}: {}", score.summary());
    let components = &score.components;
    for (name, points) in [
        ("Seasonal", components.seasonal),
        ("Time window", components.time_window),
        ("Wind", components.wind),
        ("Tide", components.tide),
        ("Water quality", components.water_quality),
        ("Weather pattern", components.weather_pattern),
    ] {
        println!("- {name}: {points}");
    }
    let readings = &score.readings;
    println!(
        "- Inputs: {} m/s {} | tide {} | air {:.1} °C",
        readings.wind_speed,
        readings.wind_direction,
        readings.tide.label(),
        readings.air_temperature
    );
}

fn render_alert(result: &AlertResult) {
    println!("Community alert: {}", result.summary());
    println!(
        "- {} reports in window | {} from verified watchers | {} full jubilee",
        result.total_report_count,
        result.verified_watcher_count,
        result.full_jubilee_report_count
    );
    println!("- {} reports near reference", result.nearby_report_count);
}
