use seed::{prelude::*, virtual_dom::AtValue, *};
use serde::Deserialize;
use serde_wasm_bindgen::to_value;
use shared::{Coordinate, PoiId, RouteMode};
use wasm_bindgen::{
    JsCast,
    prelude::{JsValue, wasm_bindgen},
};

use crate::catalog::CategoryFilter;
use crate::client::{HttpBackend, RouteBackend};
use crate::config::ClientConfig;
use crate::map_layer::{MapSurface, Polyline, RouteBounds};
use crate::markers::MarkerView;
use crate::planner::{Command, Event, Planner};
use crate::render::{ComparisonTable, RouteOption, Side, StopKind, TimelineEntry};
use crate::selection::MAX_DESTINATIONS;

#[wasm_bindgen(module = "/leaflet_bridge.js")]
extern "C" {
    #[wasm_bindgen(js_name = initMap)]
    fn init_map();
    #[wasm_bindgen(js_name = showMarkers)]
    fn show_markers_js(markers: JsValue);
    #[wasm_bindgen(js_name = addRoutePolyline)]
    fn add_route_polyline_js(polyline: JsValue);
    #[wasm_bindgen(js_name = removeRouteLayer)]
    fn remove_route_layer_js();
    #[wasm_bindgen(js_name = fitBounds)]
    fn fit_bounds_js(bounds: JsValue, padding: u32);
    #[wasm_bindgen(js_name = addBlockMarker)]
    fn add_block_marker_js(at: JsValue);
    #[wasm_bindgen(js_name = clearBlockMarkers)]
    fn clear_block_markers_js();
    #[wasm_bindgen(js_name = setBlockCursor)]
    fn set_block_cursor(active: bool);
}

fn debug(message: &str) {
    web_sys::console::debug_1(&message.into());
}

/// Leaflet, through `leaflet_bridge.js`.
struct LeafletMap;

impl MapSurface for LeafletMap {
    fn show_markers(&mut self, markers: &[MarkerView]) {
        if let Ok(value) = to_value(markers) {
            show_markers_js(value);
        }
    }

    fn add_route_polyline(&mut self, polyline: &Polyline) {
        if let Ok(value) = to_value(polyline) {
            add_route_polyline_js(value);
        }
    }

    fn remove_route_layer(&mut self) {
        remove_route_layer_js();
    }

    fn fit_bounds(&mut self, bounds: RouteBounds, padding_px: u32) {
        if let Ok(value) = to_value(&bounds) {
            fit_bounds_js(value, padding_px);
        }
    }

    fn add_block_marker(&mut self, at: Coordinate) {
        if let Ok(value) = to_value(&at) {
            add_block_marker_js(value);
        }
    }

    fn clear_block_markers(&mut self) {
        clear_block_markers_js();
    }
}

pub struct Model {
    planner: Planner<LeafletMap>,
    backend: HttpBackend,
}

pub enum Msg {
    App(Event),
    OriginPicked(String),
    DestinationPicked(String),
    CategoryPicked(String),
    ModePicked(String),
}

#[derive(Deserialize)]
struct MapClickPayload {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct MarkerClickPayload {
    id: PoiId,
}

fn event_detail<T: for<'de> Deserialize<'de>>(event: web_sys::Event) -> Option<T> {
    let event = event.dyn_into::<web_sys::CustomEvent>().ok()?;
    serde_wasm_bindgen::from_value(event.detail()).ok()
}

fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    orders.stream(streams::window_event(Ev::from("map-click"), |event| {
        let payload: MapClickPayload = event_detail(event)?;
        debug(&format!(
            "[frontend] map click lat={:.5} lon={:.5}",
            payload.lat, payload.lon
        ));
        Some(Msg::App(Event::MapClicked(Coordinate {
            lat: payload.lat,
            lon: payload.lon,
        })))
    }));
    orders.stream(streams::window_event(Ev::from("marker-click"), |event| {
        let payload: MarkerClickPayload = event_detail(event)?;
        Some(Msg::App(Event::MarkerClicked(payload.id)))
    }));

    let model = Model {
        planner: Planner::new(LeafletMap),
        backend: HttpBackend::new(ClientConfig::from_env()),
    };
    perform(model.planner.init(), &model.backend, orders);
    model
}

fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    let event = match msg {
        Msg::App(event) => event,
        Msg::OriginPicked(value) => match value.parse() {
            Ok(id) => Event::SetOrigin(id),
            Err(_) => return,
        },
        Msg::DestinationPicked(value) => match value.parse() {
            Ok(id) => Event::AddDestination(id),
            Err(_) => return,
        },
        Msg::CategoryPicked(value) => Event::FilterCategory(CategoryFilter::from_value(&value)),
        Msg::ModePicked(value) => Event::SetMode(match value.as_str() {
            "compare" => RouteMode::Compare,
            _ => RouteMode::Alternatives,
        }),
    };
    let commands = model.planner.update(event);
    set_block_cursor(model.planner.overlay().is_active());
    perform(commands, &model.backend, orders);
}

fn perform(commands: Vec<Command>, backend: &HttpBackend, orders: &mut impl Orders<Msg>) {
    for command in commands {
        let backend = backend.clone();
        match command {
            Command::LoadPois => {
                orders.perform_cmd(async move {
                    Msg::App(Event::CatalogLoaded(backend.fetch_pois().await))
                });
            }
            Command::FetchRoute { token, request } => {
                debug(&format!("[frontend] route request {token}"));
                orders.perform_cmd(async move {
                    let result = backend.request_route(&request).await;
                    Msg::App(Event::RouteFetched { token, result })
                });
            }
            Command::BlockRoad(at) => {
                orders.perform_cmd(async move {
                    Msg::App(Event::BlockAcked(backend.block_road(at).await))
                });
            }
            Command::ResetBlocks => {
                orders.perform_cmd(async move {
                    Msg::App(Event::ResetAcked(backend.reset_blocks().await))
                });
            }
            Command::Alert(message) | Command::Notice(message) => {
                if window().alert_with_message(&message).is_err() {
                    web_sys::console::error_1(&message.into());
                }
            }
        }
    }
}

fn view(model: &Model) -> Node<Msg> {
    div![
        C!["app-container"],
        h1!["Tour planner"],
        view_controls(model),
        view_result(model),
    ]
}

fn view_controls(model: &Model) -> Node<Msg> {
    let planner = &model.planner;
    let selection = planner.selection();
    let catalog = planner.catalog();

    let category_options = std::iter::once(option![attrs! { At::Value => "all" }, "All categories"])
        .chain(
            catalog
                .categories()
                .into_iter()
                .map(|category| option![attrs! { At::Value => category }, category]),
        );

    // The select's value mirrors the selection, so a rejected pick snaps back.
    let origin_value = selection
        .origin()
        .map(|id| id.to_string())
        .unwrap_or_default();
    let origin_options = std::iter::once(option![attrs! { At::Value => "" }, "Starting point…"])
        .chain(
            planner
                .origin_choices()
                .map(|poi| option![attrs! { At::Value => poi.id }, &poi.name]),
        );

    let destination_options = std::iter::once(option![attrs! { At::Value => "" }, "Add destination…"])
        .chain(
            planner
                .destination_choices()
                .map(|poi| option![attrs! { At::Value => poi.id }, &poi.name]),
        );

    let chosen = selection.destinations().iter().map(|&id| {
        li![
            catalog.display_name(id),
            button![
                "✕",
                ev(Ev::Click, move |event| {
                    event.prevent_default();
                    Msg::App(Event::RemoveDestination(id))
                }),
                C!["remove-btn"],
            ]
        ]
    });

    let overlay = planner.overlay();

    form![
        C!["controls"],
        fieldset![
            legend!["Points"],
            select![
                C!["category-filter"],
                attrs! { At::Value => planner.filter().value() },
                category_options,
                input_ev(Ev::Change, Msg::CategoryPicked)
            ],
            select![
                C!["start-select"],
                attrs! { At::Value => origin_value },
                origin_options,
                input_ev(Ev::Change, Msg::OriginPicked)
            ],
            select![
                C!["dest-select"],
                attrs! {
                    At::Value => "",
                    At::Disabled => bool_attr(selection.is_full()),
                },
                destination_options,
                input_ev(Ev::Change, Msg::DestinationPicked)
            ],
            ul![C!["chosen-destinations"], chosen],
            small![format!(
                "{}/{} destinations",
                selection.destinations().len(),
                MAX_DESTINATIONS
            )],
            button![
                "Clear",
                ev(Ev::Click, |event| {
                    event.prevent_default();
                    Msg::App(Event::ClearSelection)
                }),
            ],
        ],
        fieldset![
            legend!["Algorithm"],
            select![
                C!["algo-select"],
                attrs! {
                    At::Value => match planner.mode() {
                        RouteMode::Alternatives => "alternatives",
                        RouteMode::Compare => "compare",
                    },
                },
                option![attrs! { At::Value => "alternatives" }, "Best routes"],
                option![attrs! { At::Value => "compare" }, "Compare A* vs Dijkstra"],
                input_ev(Ev::Change, Msg::ModePicked)
            ],
        ],
        fieldset![
            legend!["Road blocks"],
            button![
                if overlay.is_active() {
                    "Road block mode: ON"
                } else {
                    "Road block mode: OFF"
                },
                C![IF!(overlay.is_active() => "active")],
                ev(Ev::Click, |event| {
                    event.prevent_default();
                    Msg::App(Event::ToggleBlockMode)
                }),
            ],
            button![
                "Reset blocks",
                ev(Ev::Click, |event| {
                    event.prevent_default();
                    Msg::App(Event::ResetBlocks)
                }),
            ],
            IF!(overlay.is_active() => small!["Click the map to block the nearest road."]),
            small![format!("{} blocked", overlay.blocked_points().len())],
        ],
        button![
            "Compute route",
            ev(Ev::Click, |event| {
                event.prevent_default();
                Msg::App(Event::Compute)
            }),
            attrs! { At::Disabled => bool_attr(planner.is_pending()) },
        ],
        IF!(planner.is_pending() => div![C!["loading"], "Computing…"]),
    ]
}

fn view_result(model: &Model) -> Node<Msg> {
    let planner = &model.planner;
    if let Some(table) = planner.comparison() {
        return div![C!["result-card"], view_comparison(&table)];
    }
    match (planner.route_options(), planner.timeline()) {
        (Some(options), Some(timeline)) => div![
            C!["result-card"],
            view_route_options(&options),
            view_timeline(&timeline),
        ],
        _ => div![
            C!["result-card", "empty"],
            p!["Pick a starting point and destinations, then compute a route."]
        ],
    }
}

fn view_route_options(options: &[RouteOption]) -> Node<Msg> {
    div![
        C!["route-options-list"],
        options.iter().map(|option| {
            let rank = option.rank;
            div![
                C!["route-card", IF!(option.active => "active")],
                ev(Ev::Click, move |_| Msg::App(Event::SelectRank(rank))),
                div![
                    C!["route-info"],
                    h4![&option.title],
                    p![format!("{} destinations", option.destination_count)],
                ],
                div![
                    C!["route-meta"],
                    span![C!["route-dist"], format!("{} km", option.total_km)]
                ],
            ]
        })
    ]
}

fn view_timeline(entries: &[TimelineEntry]) -> Node<Msg> {
    div![
        C!["timeline-box"],
        h3!["Trip details"],
        entries.iter().map(|entry| {
            let kind = match entry.kind {
                StopKind::Origin => "start",
                StopKind::Destination => "dest",
            };
            div![
                C!["timeline-item", kind],
                div![C!["timeline-marker"]],
                div![C!["timeline-content"], h4![&entry.label], p![&entry.name]],
            ]
        })
    ]
}

fn view_comparison(table: &ComparisonTable) -> Node<Msg> {
    let cell = |value: &str, wins: bool| -> Node<Msg> { td![C![IF!(wins => "winner")], value] };
    div![
        h3!["Benchmark"],
        table![
            C!["compare-table"],
            thead![tr![
                th!["Metric"],
                th![&table.primary_label],
                th![&table.baseline_label]
            ]],
            tbody![table.rows.iter().map(|row| {
                tr![
                    td![row.metric],
                    cell(&row.primary, row.winner == Side::Primary),
                    cell(&row.baseline, row.winner == Side::Baseline),
                ]
            })],
        ],
        div![C!["analysis"], table.analysis()],
    ]
}

fn bool_attr(value: bool) -> AtValue {
    if value {
        AtValue::Some("true".into())
    } else {
        AtValue::Ignored
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    init_map();
    App::start("app", init, update, view);
}
