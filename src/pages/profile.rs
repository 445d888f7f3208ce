use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::profile::{parse_age, parse_interests, ProfileData, ProfilePatch};

#[derive(Properties, PartialEq)]
pub struct ProfileProps {
    pub profile: ProfileData,
    pub on_update: Callback<ProfilePatch>,
}

/// Raw form fields; parsed into a patch on save.
#[derive(Clone, PartialEq)]
struct ProfileForm {
    pet_name: String,
    pet_image: String,
    age: String,
    breed: String,
    location: String,
    about: String,
    interests: String,
    owner_name: String,
    owner_image: String,
}

impl ProfileForm {
    fn from_profile(profile: &ProfileData) -> Self {
        Self {
            pet_name: profile.pet_name.clone(),
            pet_image: profile.pet_image.clone(),
            age: profile.pet_age.to_string(),
            breed: profile.pet_breed.clone(),
            location: profile.location.clone(),
            about: profile.bio.clone(),
            interests: profile.interests.join(", "),
            owner_name: profile.owner_name.clone(),
            owner_image: profile.owner_image.clone(),
        }
    }

    fn into_patch(self) -> ProfilePatch {
        ProfilePatch {
            pet_name: Some(self.pet_name),
            pet_image: Some(self.pet_image),
            pet_age: parse_age(&self.age),
            pet_gender: None,
            pet_breed: Some(self.breed),
            owner_name: Some(self.owner_name),
            owner_image: Some(self.owner_image),
            location: Some(self.location),
            bio: Some(self.about),
            interests: Some(parse_interests(&self.interests)),
        }
    }
}

#[function_component(ProfilePage)]
pub fn profile_page(props: &ProfileProps) -> Html {
    let editing = use_state(|| None::<ProfileForm>);
    let profile = &props.profile;

    let Some(form) = (*editing).clone() else {
        let start_edit = {
            let editing = editing.clone();
            let profile = profile.clone();
            Callback::from(move |_: MouseEvent| editing.set(Some(ProfileForm::from_profile(&profile))))
        };
        return html! {
            <div class="profile">
                <header class="page-header">
                    <h1>{ "Profile" }</h1>
                    <button class="btn-secondary" onclick={start_edit}>{ "Edit" }</button>
                </header>
                <div class="profile-hero">
                    <img class="avatar large" src={profile.pet_image.clone()} alt={profile.pet_name.clone()} />
                    <h2>{ format!("{}, {}", profile.pet_name, profile.pet_age) }</h2>
                    <p class="muted">{ format!("{} · {} · {}", profile.pet_breed, profile.pet_gender.label(), profile.location) }</p>
                </div>
                <section>
                    <h3>{ "About" }</h3>
                    <p>{ &profile.bio }</p>
                </section>
                <section>
                    <h3>{ "Interests" }</h3>
                    <div class="tags">
                        { for profile.interests.iter().map(|interest| html! { <span class="tag">{ interest }</span> }) }
                    </div>
                </section>
                <section class="owner">
                    <img class="avatar" src={profile.owner_image.clone()} alt={profile.owner_name.clone()} />
                    <span>{ &profile.owner_name }</span>
                </section>
            </div>
        };
    };

    let field = |label: &'static str, value: String, apply: fn(&mut ProfileForm, String)| {
        let editing = editing.clone();
        let onchange = Callback::from(move |event: Event| {
            if let Some(mut next) = (*editing).clone() {
                apply(&mut next, event.target_unchecked_into::<HtmlInputElement>().value());
                editing.set(Some(next));
            }
        });
        html! {
            <label class="field">
                <span>{ label }</span>
                <input class="input" value={value} onchange={onchange} />
            </label>
        }
    };

    let on_about = {
        let editing = editing.clone();
        Callback::from(move |event: Event| {
            if let Some(mut next) = (*editing).clone() {
                next.about = event.target_unchecked_into::<HtmlTextAreaElement>().value();
                editing.set(Some(next));
            }
        })
    };

    let save = {
        let editing = editing.clone();
        let on_update = props.on_update.clone();
        let form = form.clone();
        Callback::from(move |_: MouseEvent| {
            on_update.emit(form.clone().into_patch());
            editing.set(None);
        })
    };
    let cancel = {
        let editing = editing.clone();
        Callback::from(move |_: MouseEvent| editing.set(None))
    };

    html! {
        <div class="profile edit">
            <header class="page-header">
                <button class="icon-button" onclick={cancel}>{ "←" }</button>
                <h1>{ "Edit profile" }</h1>
                <button class="btn-primary" onclick={save}>{ "Save" }</button>
            </header>
            { field("Pet name", form.pet_name.clone(), |f, v| f.pet_name = v) }
            { field("Pet photo URL", form.pet_image.clone(), |f, v| f.pet_image = v) }
            { field("Age", form.age.clone(), |f, v| f.age = v) }
            { field("Breed", form.breed.clone(), |f, v| f.breed = v) }
            { field("Location", form.location.clone(), |f, v| f.location = v) }
            <label class="field">
                <span>{ "About" }</span>
                <textarea class="input" value={form.about.clone()} onchange={on_about} />
            </label>
            { field("Interests (comma separated)", form.interests.clone(), |f, v| f.interests = v) }
            { field("Owner name", form.owner_name.clone(), |f, v| f.owner_name = v) }
            { field("Owner photo URL", form.owner_image.clone(), |f, v| f.owner_image = v) }
        </div>
    }
}
