use countdown_core::EndingFace;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub face: EndingFace,
}

/// Black full-screen farewell: each line fades in and out in its own phase.
#[function_component(EndingScreen)]
pub fn ending_screen(p: &Props) -> Html {
    html! {
        <div class="ending-screen flex items-center justify-center min-h-screen bg-black"
             data-phase={p.face.phase.step().to_string()}>
            { for p.face.lines.iter().map(|line| {
                let opacity = if line.visible { "opacity-100" } else { "opacity-0" };
                html! {
                    <div class={classes!("ending-line", "text-white", "text-sm", opacity,
                                         "transition-opacity", "duration-1000", "absolute")}
                         aria-hidden={(!line.visible).to_string()}>
                        { line.text.clone() }
                    </div>
                }
            }) }
        </div>
    }
}
