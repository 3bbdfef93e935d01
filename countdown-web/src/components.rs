pub mod clock_face;
pub mod countdown_clock;
pub mod ending_screen;
pub mod stop_button;
