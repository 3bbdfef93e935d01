use std::rc::Rc;

use yew::prelude::*;

use crate::components::countdown_clock::CountdownClock;
use crate::config::load_config;

/// Top-level component: loads the bundled configuration and mounts the clock.
#[function_component(App)]
pub fn app() -> Html {
    let loaded = use_memo((), |_| load_config().map(Rc::new));
    match &*loaded {
        Ok(config) => html! { <CountdownClock config={Rc::clone(config)} /> },
        Err(err) => {
            log::error!("{err}");
            html! {
                <section role="alert" class="config-error text-red-500">
                    <h3>{ "Configuration Error" }</h3>
                    <p class="error">{ err.to_string() }</p>
                </section>
            }
        }
    }
}
