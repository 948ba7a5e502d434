pub mod band_scale;
pub mod locale;
pub mod primitives;
pub mod scale;
pub mod time_scale;
pub mod time_ticks;
pub mod types;

pub use band_scale::BandScale;
pub use locale::Locale;
pub use primitives::{datetime_to_unix_millis, unix_millis_to_datetime};
pub use scale::LinearScale;
pub use time_scale::TimeScale;
pub use time_ticks::{TimeTick, TimeTickInterval, generate_time_ticks};
pub use types::{AxisDomain, AxisType, AxisValue, Padding};
