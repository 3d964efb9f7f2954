use super::{ClimateMode, ClimateSetting, FanSpeed, Intent, Season};

pub fn default_seasonal_table() -> Vec<(Season, Intent, ClimateSetting)> {
    let auto = |temperature| ClimateSetting {
        temperature,
        mode: ClimateMode::Auto,
        fan_speed: FanSpeed::Auto,
    };
    let cool = |temperature| ClimateSetting {
        temperature,
        mode: ClimateMode::Cool,
        fan_speed: FanSpeed::Auto,
    };
    let heat = |temperature| ClimateSetting {
        temperature,
        mode: ClimateMode::Heat,
        fan_speed: FanSpeed::Auto,
    };

    vec![
        (Season::Spring, Intent::PowerOn, auto(27)),
        (Season::Spring, Intent::PowerOff, auto(27)),
        (Season::Summer, Intent::PowerOn, cool(27)),
        (Season::Summer, Intent::PowerOff, cool(27)),
        (Season::Autumn, Intent::PowerOn, auto(28)),
        (Season::Autumn, Intent::PowerOff, auto(28)),
        (Season::Winter, Intent::PowerOn, heat(22)),
        (Season::Winter, Intent::PowerOff, auto(22)),
    ]
}
