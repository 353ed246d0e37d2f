use console::Style;
use viewsim_core::catalog::{DeviceCategory, DeviceProfile};
use viewsim_core::layout::{status_label, AvailableRect, LayoutResult};
use viewsim_core::messages::Effect;
use viewsim_core::state::{ViewMode, ViewportState};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    device: Style,
    disabled: Style,
    address: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            device: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            address: Style::new().underlined(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!(
        "  {}",
        s.title.apply_to("\u{2550}".repeat(title.chars().count()))
    );
    println!();
}

pub fn print_device_table<'a>(
    category: DeviceCategory,
    profiles: impl Iterator<Item = &'a DeviceProfile>,
) {
    let s = Styles::new();

    println!();
    println!("  {}", s.header.apply_to(category.to_string().to_uppercase()));
    for profile in profiles {
        println!(
            "    {:<16}{:<28}{}",
            s.device.apply_to(profile.id),
            profile.name,
            s.value.apply_to(profile.portrait),
        );
    }
}

/// Print the full view state plus the layout it produces in `rect`.
pub fn print_state(title: &str, state: &ViewportState, layout: &LayoutResult, rect: AvailableRect) {
    let s = Styles::new();

    print_title(&s, title);

    println!(
        "  {:<14}{}",
        s.label.apply_to("Mode"),
        s.value.apply_to(state.mode())
    );
    match state.mode() {
        ViewMode::Device => {
            println!(
                "  {:<14}{} ({})",
                s.label.apply_to("Device"),
                s.device.apply_to(
                    state
                        .selected_device()
                        .map(|d| d.to_string())
                        .unwrap_or_default()
                ),
                state.category(),
            );
            println!(
                "  {:<14}{}",
                s.label.apply_to("Orientation"),
                s.value.apply_to(state.orientation())
            );
        }
        ViewMode::Responsive => {
            println!(
                "  {:<14}{}",
                s.label.apply_to("Zoom"),
                if state.manual_zoom_override() {
                    s.value.apply_to("manual".to_string())
                } else {
                    s.disabled.apply_to("auto".to_string())
                }
            );
        }
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Custom"),
        s.value.apply_to(state.custom_device().dimensions())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Address"),
        s.address.apply_to(state.content_address())
    );
    println!();

    println!("  {}", s.header.apply_to("Layout"));
    println!(
        "    {:<12}{} \u{00d7} {}",
        s.label.apply_to("Panel"),
        rect.width,
        rect.height
    );
    println!(
        "    {:<12}{:.1} \u{00d7} {:.1}",
        s.label.apply_to("Frame"),
        layout.frame_width,
        layout.frame_height
    );
    println!(
        "    {:<12}{:.1} \u{00d7} {:.1} @ {:.2}",
        s.label.apply_to("Content"),
        layout.content_width,
        layout.content_height,
        layout.content_scale
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Status"),
        s.value.apply_to(status_label(state, layout))
    );
    println!();
}

pub fn describe_effect(effect: &Effect) -> String {
    match effect {
        Effect::ApplyLayout(layout) => format!(
            "layout {:.1}x{:.1} scale {:.2}",
            layout.frame_width, layout.frame_height, layout.content_scale
        ),
        Effect::Load(address) => format!("load {address}"),
        Effect::ShowAddress(address) => format!("show {address}"),
        Effect::HistoryBack => "history back".to_string(),
        Effect::HistoryForward => "history forward".to_string(),
        Effect::Reload => "reload".to_string(),
    }
}

pub struct ReplayTotals {
    pub events: usize,
    pub effects: usize,
    pub messages: usize,
    pub elapsed_ms: u64,
}

pub fn print_replay_summary(totals: &ReplayTotals) {
    let s = Styles::new();

    println!("  {}", s.header.apply_to("Replay"));
    for (label, value) in [
        ("Events", totals.events),
        ("Effects", totals.effects),
        ("Messages", totals.messages),
    ] {
        println!(
            "    {:<12}{}",
            s.label.apply_to(label),
            s.value.apply_to(value)
        );
    }
    println!(
        "    {:<12}{} ms",
        s.label.apply_to("Clock"),
        s.value.apply_to(totals.elapsed_ms)
    );
    println!();
}
