use countdown_core::{CountingFace, Face};
use yew::prelude::*;

use super::ending_screen::EndingScreen;
use super::stop_button::StopButton;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub face: Face,
    #[prop_or_default]
    pub on_stop: Callback<MouseEvent>,
}

/// Pure view of the engine's [`Face`]; holds no state of its own.
#[function_component(ClockFace)]
pub fn clock_face(p: &Props) -> Html {
    match &p.face {
        Face::Loading => html! {
            <div class="clock-loading text-neon-green text-4xl" role="status">{ "Loading..." }</div>
        },
        Face::Ending(face) => html! { <EndingScreen face={face.clone()} /> },
        Face::Counting(face) => counting_view(face, &p.on_stop),
    }
}

fn counting_view(face: &CountingFace, on_stop: &Callback<MouseEvent>) -> Html {
    let digits_class = classes!(
        "countdown-digits",
        "flex",
        "flex-wrap",
        "justify-center",
        face.shaking.then_some("animate-shake")
    );
    let digit_class = classes!(
        "countdown-digit",
        "bg-gray-900",
        "rounded-lg",
        face.urgent
            .then_some(vec!["countdown-digit--urgent", "animate-pulse", "text-red-500"])
    );
    html! {
        <div class="countdown flex flex-col items-center justify-center min-h-screen bg-black text-neon-green">
            <div class="countdown-greeting">{ face.greeting.clone() }</div>
            <div class={digits_class} role="timer" aria-live="off">
                { for face.digits.iter().map(|group| html! {
                    <div class="countdown-group flex flex-col items-center" key={group.unit.key()}>
                        <span class={digit_class.clone()}>{ group.value.clone() }</span>
                        <span class="countdown-label">{ group.label.clone() }</span>
                    </div>
                }) }
            </div>
            <StopButton onclick={on_stop.clone()} />
            {
                face.message.as_ref().map(|message| html! {
                    <div class="countdown-message text-red-500" role="alert">{ message.clone() }</div>
                }).unwrap_or_default()
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use countdown_core::{DigitGroup, FULL_UNITS, LAST_DAY_UNITS, Remaining};
    use futures::executor::block_on;
    use yew::LocalServerRenderer;

    fn counting(millis: i64, urgent: bool, shaking: bool, message: Option<&str>) -> Face {
        let remaining = Remaining::from_millis(millis).unwrap();
        let units = if urgent { LAST_DAY_UNITS } else { FULL_UNITS };
        Face::Counting(CountingFace {
            greeting: "Ben...".into(),
            digits: units
                .iter()
                .map(|unit| DigitGroup::read(&remaining, *unit))
                .collect(),
            urgent,
            shaking,
            message: message.map(str::to_string),
        })
    }

    fn render(face: Face) -> String {
        let props = Props {
            face,
            on_stop: Callback::noop(),
        };
        block_on(LocalServerRenderer::<ClockFace>::with_props(props).render())
    }

    #[test]
    fn loading_face_renders_placeholder() {
        let html = render(Face::Loading);
        assert!(html.contains("Loading..."));
        assert!(!html.contains("stop-button"));
    }

    #[test]
    fn counting_face_renders_units_and_button() {
        let html = render(counting(3 * 86_400_000 + 5_000, false, false, None));
        assert!(html.contains("Ben..."));
        assert!(html.contains("Days"), "{html}");
        assert!(html.contains("Seconds"));
        assert!(html.contains("03"), "{html}");
        assert!(html.contains("stop-button"));
        assert!(!html.contains("animate-shake"));
        assert!(!html.contains("countdown-message"));
    }

    #[test]
    fn taunt_shakes_and_shows_message() {
        let html = render(counting(86_400_000 * 2, false, true, Some("Failed to stop, - 1 day")));
        assert!(html.contains("animate-shake"));
        assert!(html.contains("Failed to stop, - 1 day"));
    }

    #[test]
    fn last_day_uses_urgent_styling() {
        let html = render(counting(3_600_000, true, false, None));
        assert!(html.contains("animate-pulse"));
        assert!(html.contains("Milliseconds"));
        assert!(!html.contains("Days"));
    }
}
