//! The volunteer application form.

use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base,
    },
    navigation::NavBar,
    volunteer::core::AREAS_OF_INTEREST,
};

/// Display the volunteer application form.
pub async fn get_volunteer_page() -> Markup {
    let content = html! {
        (NavBar::new(endpoints::VOLUNTEER_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-md"
            {
                h1 class="text-3xl font-bold mb-2" { "Become a volunteer" }

                p class="text-gray-600 dark:text-gray-300 mb-6"
                {
                    "Join our community of volunteers caring for the stray cats of Jakarta. \
                    We will get in touch once your application has been reviewed."
                }

                form
                    class="space-y-4"
                    hx-post=(endpoints::VOLUNTEERS_API)
                    hx-target-error="this"
                {
                    div class="grid gap-4 md:grid-cols-2"
                    {
                        (text_input("first_name", "First name", "text"))
                        (text_input("last_name", "Last name", "text"))
                    }

                    (text_input("email", "Email", "email"))
                    (text_input("phone_number", "Phone number", "tel"))
                    (text_input("address", "Address", "text"))

                    div
                    {
                        label for="area_of_interest" class=(FORM_LABEL_STYLE)
                        {
                            "Area of interest"
                        }

                        select
                            name="area_of_interest"
                            id="area_of_interest"
                            class=(FORM_TEXT_INPUT_STYLE)
                            required
                        {
                            @for area in AREAS_OF_INTEREST {
                                option value=(area) { (area) }
                            }
                        }
                    }

                    div
                    {
                        label for="experience" class=(FORM_LABEL_STYLE)
                        {
                            "Relevant experience (optional)"
                        }

                        textarea
                            name="experience"
                            id="experience"
                            rows="4"
                            class=(FORM_TEXT_INPUT_STYLE)
                        {}
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }
                }
            }
        }
    };

    base("Volunteer", &[], &content)
}

fn text_input(name: &str, label: &str, input_type: &str) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                type=(input_type)
                name=(name)
                id=(name)
                class=(FORM_TEXT_INPUT_STYLE)
                required;
        }
    }
}
