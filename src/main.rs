mod api;
mod app;
mod components;
mod dates;
mod models;
mod pages;
mod session;

fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<app::App>::new().render();
}
