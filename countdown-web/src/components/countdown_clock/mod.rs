mod host;

use std::rc::Rc;

use countdown_core::{CountdownConfig, Face};
use yew::prelude::*;

use super::clock_face::ClockFace;
use crate::dom;
use host::{ClockHost, SharedHost};

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub config: Rc<CountdownConfig>,
}

/// The live widget: owns the engine for as long as it is mounted.
#[function_component(CountdownClock)]
pub fn countdown_clock(p: &Props) -> Html {
    let face = use_state_eq(|| Face::Loading);
    let host = use_mut_ref(|| None::<SharedHost>);

    {
        let face = face.clone();
        let host = host.clone();
        use_effect_with(p.config.clone(), move |config| {
            let on_face = Callback::from(move |next: Face| face.set(next));
            match ClockHost::mount(config, on_face) {
                Ok(mounted) => *host.borrow_mut() = Some(mounted),
                Err(err) => {
                    let message = format!("Countdown failed to start: {err}");
                    log::error!("{message}");
                    dom::console_error(&message);
                }
            }
            move || {
                host.borrow_mut().take();
            }
        });
    }

    let on_stop = {
        let host = host.clone();
        Callback::from(move |_: MouseEvent| {
            let mounted = host.borrow().clone();
            if let Some(mounted) = mounted {
                ClockHost::press_stop(&mounted);
            }
        })
    };

    html! { <ClockFace face={(*face).clone()} {on_stop} /> }
}
