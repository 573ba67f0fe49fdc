//! HTTP server for the interactive dashboard
//!
//! `vitrine serve ./dataset/games_2021_2025.csv` → loads the catalog once,
//! starts the server, opens the browser, serves the menu-driven charts.
//!
//! Every menu change or slider move issues a fresh `/api/analysis` request;
//! the handler recomputes the selected aggregation from the cached catalog.
//! No request mutates anything.

use crate::analysis::pricing::{
    price_histogram, price_review_correlation, PriceReviewCorrelation, DEFAULT_MAX_PRICE,
};
use crate::analysis::rankings::{self, GenreRatio, TOP_N};
use crate::analysis::timeline::{self, MonthCount, SemesterCount, PARTIAL_YEAR_NOTE};
use crate::analysis::Analysis;
use crate::catalog::Catalog;
use crate::report::CatalogSummary;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use tiny_http::{Header, Method, Request, Response, Server};

// Embed the UI directly in the binary
const UI_HTML: &str = include_str!("ui.html");

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    fn failure(error: String) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct AnalysisParams {
    #[serde(default = "default_view")]
    pub view: String,
    /// Slider value for the price-distribution view; clamped server-side.
    #[serde(default = "default_max_price")]
    pub max_price: u32,
}

fn default_view() -> String {
    Analysis::TopReviewed.key().to_string()
}

fn default_max_price() -> u32 {
    DEFAULT_MAX_PRICE
}

#[derive(Serialize)]
struct SummaryPayload {
    source: String,
    summary: CatalogSummary,
}

#[derive(Serialize)]
struct LaunchPayload {
    series: Vec<SemesterCount>,
    note: &'static str,
}

/// The "Deeper Questions" view: three sub-tabs served together. A missing
/// positive-review column only degrades the ratios tab.
#[derive(Serialize)]
struct DeepDivePayload {
    correlation: PriceReviewCorrelation,
    genre_ratios: Option<Vec<GenreRatio>>,
    genre_ratios_error: Option<String>,
    seasonality: Vec<MonthCount>,
}

/// Load the catalog, start the server, open the browser, serve the UI.
/// A missing catalog file fails here, before anything is served.
pub fn start(port: u16, catalog_path: PathBuf) -> io::Result<()> {
    let catalog = Catalog::cached(&catalog_path)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let addr = format!("127.0.0.1:{}", port);
    let server =
        Server::http(&addr).map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let url = format!("http://localhost:{}", port);

    eprintln!("\n\x1b[1;32m🪟 Vitrine\x1b[0m");
    eprintln!("   {}", url);
    eprintln!(
        "   Catalog: {} ({} games)\n",
        catalog.source.display(),
        catalog.len()
    );

    // Open browser
    let _ = open::that(&url);

    // Handle requests
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, catalog) {
            eprintln!("Error: {}", e);
        }
    }

    Ok(())
}

fn handle_request(request: Request, catalog: &Catalog) -> io::Result<()> {
    let url = request.url().to_string();
    let path = url.split('?').next().unwrap_or("/");
    let method = request.method().clone();

    match (&method, path) {
        // Serve embedded UI
        (&Method::Get, "/") => {
            let html = UI_HTML.replace("{{CATALOG_SOURCE}}", &catalog.source.display().to_string());
            let response = Response::from_string(html)
                .with_header(Header::from_bytes(&b"Content-Type"[..], &b"text/html"[..]).unwrap());
            request.respond(response)
        }

        // API: catalog headline counts for the dashboard header
        (&Method::Get, "/api/summary") => {
            let payload = SummaryPayload {
                source: catalog.source.display().to_string(),
                summary: CatalogSummary::from_records(&catalog.records),
            };
            let json = serde_json::to_string(&ApiResponse::success(payload))?;
            respond_json(request, json)
        }

        // API: one analysis per request, selected by menu key
        (&Method::Get, "/api/analysis") => {
            let params = parse_params(&request);
            let json = analysis_json(catalog, &params)?;
            respond_json(request, json)
        }

        // 404
        _ => {
            let response = Response::from_string("Not found").with_status_code(404);
            request.respond(response)
        }
    }
}

fn respond_json(request: Request, json: String) -> io::Result<()> {
    let response = Response::from_string(json).with_header(
        Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
    );
    request.respond(response)
}

fn parse_params(request: &Request) -> AnalysisParams {
    request
        .url()
        .split('?')
        .nth(1)
        .and_then(|query| serde_urlencoded::from_str(query).ok())
        .unwrap_or(AnalysisParams {
            view: default_view(),
            max_price: default_max_price(),
        })
}

fn analysis_json(catalog: &Catalog, params: &AnalysisParams) -> Result<String, io::Error> {
    let records = &catalog.records;

    let json = match Analysis::from_key(&params.view) {
        None => serde_json::to_string(&ApiResponse::<()>::failure(format!(
            "unknown analysis '{}'",
            params.view
        )))?,

        Some(Analysis::TopReviewed) => serde_json::to_string(&ApiResponse::success(
            rankings::top_reviewed(records, TOP_N),
        ))?,

        Some(Analysis::PriceDistribution) => serde_json::to_string(&ApiResponse::success(
            price_histogram(records, params.max_price),
        ))?,

        Some(Analysis::TopGenres) => serde_json::to_string(&ApiResponse::success(
            rankings::top_genres(records, TOP_N),
        ))?,

        Some(Analysis::LaunchEvolution) => {
            serde_json::to_string(&ApiResponse::success(LaunchPayload {
                series: timeline::launch_evolution(records),
                note: PARTIAL_YEAR_NOTE,
            }))?
        }

        Some(Analysis::DeepDive) => {
            let (genre_ratios, genre_ratios_error) =
                match rankings::genre_positive_ratios(catalog, TOP_N) {
                    Ok(ranked) => (Some(ranked), None),
                    Err(e) => (None, Some(e.to_string())),
                };
            serde_json::to_string(&ApiResponse::success(DeepDivePayload {
                correlation: price_review_correlation(records),
                genre_ratios,
                genre_ratios_error,
                seasonality: timeline::monthly_seasonality(records),
            }))?
        }
    };

    Ok(json)
}
