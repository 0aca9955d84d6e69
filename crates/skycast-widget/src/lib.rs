pub mod autocomplete;
pub mod render;
pub mod search;
pub mod widget;

pub use autocomplete::{AutocompleteController, AutocompleteSettings, AutocompleteState, WidgetEvent};
pub use render::{DiagnosticSink, RenderPort, TracingDiagnostics, WeatherView};
pub use search::{WeatherRequest, WeatherSearch};
pub use widget::{WeatherWidget, WidgetError, WidgetHandle};
