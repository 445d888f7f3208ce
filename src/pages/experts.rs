use log::warn;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::experts::{
    sample_specialists, Band, Directory, Occupation, Specialist, SpecialistFilter,
    CONSULTATION_BANDS, EXPERIENCE_BANDS, PRICE_BANDS,
};

#[function_component(ExpertsPage)]
pub fn experts_page() -> Html {
    let directory = use_state(|| Directory::new(sample_specialists()));
    let pending = use_state(SpecialistFilter::default);
    let status = use_state(|| None::<String>);

    let toggle_filters = {
        let directory = directory.clone();
        let pending = pending.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*directory).clone();
            pending.set(SpecialistFilter::default());
            next.toggle_filters();
            directory.set(next);
        })
    };
    let on_search = {
        let directory = directory.clone();
        Callback::from(move |event: InputEvent| {
            let mut next = (*directory).clone();
            next.set_query(&event.target_unchecked_into::<HtmlInputElement>().value());
            directory.set(next);
        })
    };
    let apply_filters = {
        let directory = directory.clone();
        let pending = pending.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*directory).clone();
            next.apply_filter(*pending);
            directory.set(next);
        })
    };

    let select = |label: &'static str,
                  options: Vec<(&'static str, &'static str)>,
                  apply: fn(&mut SpecialistFilter, &str)| {
        let pending = pending.clone();
        let onchange = Callback::from(move |event: Event| {
            let mut next = *pending;
            apply(&mut next, &event.target_unchecked_into::<HtmlSelectElement>().value());
            pending.set(next);
        });
        html! {
            <>
                <span class="filter-label">{ label }</span>
                <select class="input" onchange={onchange}>
                    <option value="">{ "Any" }</option>
                    { for options.into_iter().map(|(value, text)| html! { <option value={value}>{ text }</option> }) }
                </select>
            </>
        }
    };

    let filters = if directory.filters_open() {
        html! {
            <div class="filters">
                <div class="filter-grid">
                    { select(
                        "Profession",
                        Occupation::ALL.iter().map(|o| (o.key(), o.label())).collect(),
                        |f, v| f.occupation = Occupation::from_key(v),
                    ) }
                    { select("Experience", EXPERIENCE_BANDS.to_vec(), |f, v| f.experience = Band::parse(v)) }
                    { select("Price Range", PRICE_BANDS.to_vec(), |f, v| f.price = Band::parse(v)) }
                    { select("Consultations", CONSULTATION_BANDS.to_vec(), |f, v| f.consultations = Band::parse(v)) }
                </div>
                <button class="btn-primary" onclick={apply_filters}>{ "Apply Filters" }</button>
            </div>
        }
    } else {
        html! {}
    };

    html! {
        <div class="experts">
            <header class="page-header">
                <h1>{ "Pet Experts" }</h1>
                <button class={classes!("icon-button", directory.filters_open().then_some("active"))} onclick={toggle_filters}>
                    { "Filters" }
                </button>
            </header>
            <input class="input search" placeholder="Search specialists..." value={directory.query().to_string()} oninput={on_search} />
            { filters }
            {
                match &*status {
                    Some(message) => html! { <p class="notice">{ message }</p> },
                    None => html! {},
                }
            }
            <div class="specialist-list">
                { for directory.visible().into_iter().map(|specialist| {
                    let on_click = {
                        let id = specialist.id.clone();
                        let directory = directory.clone();
                        Callback::from(move |_: MouseEvent| {
                            let mut next = (*directory).clone();
                            next.toggle_expanded(&id);
                            directory.set(next);
                        })
                    };
                    let on_consult = {
                        let id = specialist.id.clone();
                        let directory = directory.clone();
                        let status = status.clone();
                        Callback::from(move |event: MouseEvent| {
                            event.stop_propagation();
                            match directory.start_consultation(&id) {
                                Ok(found) => status.set(Some(format!("Consultation request sent to {}", found.name))),
                                Err(err) => warn!("{}", err),
                            }
                        })
                    };
                    render_specialist(specialist, directory.is_expanded(&specialist.id), on_click, on_consult)
                }) }
            </div>
        </div>
    }
}

fn render_specialist(
    specialist: &Specialist,
    expanded: bool,
    on_click: Callback<MouseEvent>,
    on_consult: Callback<MouseEvent>,
) -> Html {
    let rating = format!("★ {:.1}", specialist.rating);
    if !expanded {
        return html! {
            <div key={specialist.id.clone()} class="specialist compact" onclick={on_click}>
                <img class="avatar" src={specialist.image.clone()} alt={specialist.name.clone()} />
                <div class="specialist-body">
                    <h3>{ &specialist.name }</h3>
                    <p class="muted">{ specialist.occupation.label() }</p>
                </div>
                <span class="rating">{ rating }</span>
            </div>
        };
    }

    html! {
        <div key={specialist.id.clone()} class="specialist expanded" onclick={on_click}>
            <div class="specialist-head">
                <img class="avatar large" src={specialist.image.clone()} alt={specialist.name.clone()} />
                <div>
                    <h2>{ &specialist.name }</h2>
                    <p class="occupation">{ specialist.occupation.label() }</p>
                    <span class="rating">{ rating }</span>
                </div>
            </div>
            <dl class="facts">
                <dt>{ "Experience" }</dt><dd>{ format!("{} years", specialist.experience) }</dd>
                <dt>{ "Certifications" }</dt><dd>{ specialist.certifications.join(", ") }</dd>
                <dt>{ "Price" }</dt><dd>{ format!("${}/hour", specialist.price_per_hour) }</dd>
                <dt>{ "Consultations" }</dt><dd>{ specialist.consultation_count.to_string() }</dd>
            </dl>
            <p>{ &specialist.bio }</p>
            <button class="btn-primary" onclick={on_consult}>{ "Start Consultation" }</button>
        </div>
    }
}
