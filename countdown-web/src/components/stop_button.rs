use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    #[prop_or(AttrValue::Static("Stop"))]
    pub label: AttrValue,
    #[prop_or_default]
    pub onclick: Callback<MouseEvent>,
}

/// The big round red button that never manages to stop anything.
#[function_component(StopButton)]
pub fn stop_button(p: &Props) -> Html {
    let onclick = p.onclick.clone();
    html! {
        <button type="button" class="stop-button flex items-center justify-center" {onclick}>
            <span class="stop-button__label">{ p.label.clone() }</span>
            <div class="stop-button__gloss" aria-hidden="true"></div>
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use yew::LocalServerRenderer;

    #[test]
    fn stop_button_renders_label() {
        let html = block_on(LocalServerRenderer::<StopButton>::with_props(yew::props!(Props {})).render());
        assert!(html.contains("stop-button"));
        assert!(html.contains("Stop"));
    }

    #[test]
    fn stop_button_accepts_custom_label() {
        let props = Props {
            label: AttrValue::from("Halt"),
            onclick: Callback::noop(),
        };
        let html = block_on(LocalServerRenderer::<StopButton>::with_props(props).render());
        assert!(html.contains("Halt"));
    }
}
