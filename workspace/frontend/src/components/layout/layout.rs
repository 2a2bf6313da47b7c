use yew::prelude::*;
use super::navbar::Navbar;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub children: Children,
    pub title: String,
    /// Controls shown in the side drawer
    #[prop_or_default]
    pub sidebar: Html,
}

#[function_component(Layout)]
pub fn layout(props: &Props) -> Html {
    html! {
        <div class="drawer lg:drawer-open">
            <input id="lakewatch-drawer" type="checkbox" class="drawer-toggle" />
            <div class="drawer-content flex flex-col min-h-screen bg-base-200">
                <Navbar title={props.title.clone()} />
                <main class="flex-1 p-6 overflow-y-auto">
                    { for props.children.iter() }
                </main>
            </div>
            <div class="drawer-side z-50">
                <label for="lakewatch-drawer" aria-label="close sidebar" class="drawer-overlay"></label>
                <aside class="bg-base-100 min-h-full w-80 p-4 flex flex-col gap-4">
                    <div class="text-2xl font-bold text-primary px-2">
                        <i class="fas fa-water"></i>{" Lakewatch"}
                    </div>
                    { props.sidebar.clone() }
                </aside>
            </div>
        </div>
    }
}
