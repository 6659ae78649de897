use crate::config::{Config, ControlConfig, Predicate};
use crate::nails::NailsGroupOptions;

/// Display controls every pattern gets: nails, strings, background.
pub fn common_controls() -> Vec<ControlConfig> {
    let show_nails = Predicate::flag("showNails");
    vec![
        ControlConfig::group(
            "nails",
            "Nails",
            vec![
                ControlConfig::checkbox("showNails", "Show nails", true),
                ControlConfig::range("nailRadius", "Nail size", 1.5, 0.5, 5.0, 0.25)
                    .with_show(show_nails.clone()),
                ControlConfig::color("nailsColor", "Nails color", "#ffffff")
                    .with_show(show_nails.clone()),
                ControlConfig::checkbox("showNailNumbers", "Show nail numbers", false)
                    .with_show(show_nails.clone()),
                ControlConfig::range("nailNumbersFontSize", "Nail numbers font size", 10.0, 4.0, 24.0, 1.0)
                    .with_show(Predicate::All(vec![show_nails, Predicate::flag("showNailNumbers")])),
            ],
        ),
        ControlConfig::group(
            "strings",
            "Strings",
            vec![
                ControlConfig::checkbox("showStrings", "Show strings", true),
                ControlConfig::range("stringWidth", "String width", 1.0, 0.2, 4.0, 0.1)
                    .with_show(Predicate::flag("showStrings")),
            ],
        ),
        ControlConfig::group(
            "background",
            "Background",
            vec![
                ControlConfig::checkbox("enableBackground", "Enable background", true),
                ControlConfig::color("backgroundColor", "Background color", "#0e0e0e")
                    .with_show(Predicate::flag("enableBackground")),
            ],
        ),
    ]
}

/// Default nail group options from the common controls.
pub fn nails_options(config: &Config) -> NailsGroupOptions {
    NailsGroupOptions {
        radius: config.number("nailRadius"),
        color: Some(config.text("nailsColor").to_string()).filter(|c| !c.is_empty()),
        show_numbers: config.flag("showNailNumbers"),
        font_size: config.number("nailNumbersFontSize"),
    }
}
