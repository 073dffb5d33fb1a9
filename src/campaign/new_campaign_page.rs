//! The admin page for creating a campaign.

use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base,
    },
    navigation::NavBar,
};

/// Display the form for creating a campaign.
pub async fn get_new_campaign_page() -> Markup {
    let content = html! {
        (NavBar::new(endpoints::NEW_CAMPAIGN_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-md"
            {
                h1 class="text-3xl font-bold mb-6" { "New campaign" }

                form
                    class="space-y-4"
                    hx-post=(endpoints::CAMPAIGNS_API)
                    hx-target-error="this"
                {
                    (text_input("title", "Title", true))
                    (text_input("short_description", "Short description", true))

                    div
                    {
                        label for="description" class=(FORM_LABEL_STYLE) { "Full story" }

                        textarea
                            name="description"
                            id="description"
                            rows="6"
                            class=(FORM_TEXT_INPUT_STYLE)
                            required
                        {}
                    }

                    (text_input("image_url", "Image URL", true))

                    div
                    {
                        label for="target_amount" class=(FORM_LABEL_STYLE)
                        {
                            "Target amount (Rp)"
                        }

                        input
                            type="number"
                            name="target_amount"
                            id="target_amount"
                            min="1"
                            step="1"
                            class=(FORM_TEXT_INPUT_STYLE)
                            required;
                    }

                    div class="grid gap-4 md:grid-cols-2"
                    {
                        div
                        {
                            label for="start_date" class=(FORM_LABEL_STYLE) { "Start date" }

                            input
                                type="date"
                                name="start_date"
                                id="start_date"
                                class=(FORM_TEXT_INPUT_STYLE)
                                required;
                        }

                        div
                        {
                            label for="end_date" class=(FORM_LABEL_STYLE) { "End date" }

                            input
                                type="date"
                                name="end_date"
                                id="end_date"
                                class=(FORM_TEXT_INPUT_STYLE)
                                required;
                        }
                    }

                    (text_input("category", "Category", true))
                    (text_input("location", "Location", true))

                    div class="flex items-center gap-2"
                    {
                        input
                            type="checkbox"
                            name="featured"
                            id="featured"
                            class="w-4 h-4 rounded border-gray-300 dark:border-gray-600";

                        label for="featured" class=(FORM_LABEL_STYLE)
                        {
                            "Feature on the home page"
                        }
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create campaign" }
                }
            }
        }
    };

    base("New campaign", &[], &content)
}

fn text_input(name: &str, label: &str, required: bool) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                type="text"
                name=(name)
                id=(name)
                class=(FORM_TEXT_INPUT_STYLE)
                required[required];
        }
    }
}

#[cfg(test)]
mod new_campaign_page_tests {
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use scraper::{Html, Selector};

    use crate::endpoints;

    use super::get_new_campaign_page;

    #[tokio::test]
    async fn page_contains_campaign_form() {
        let app = Router::new().route(endpoints::NEW_CAMPAIGN_VIEW, get(get_new_campaign_page));
        let server = TestServer::new(app);

        let response = server.get(endpoints::NEW_CAMPAIGN_VIEW).await;
        response.assert_status_ok();

        let document = Html::parse_document(&response.text());
        let form_selector =
            Selector::parse(&format!("form[hx-post='{}']", endpoints::CAMPAIGNS_API)).unwrap();
        let form = document
            .select(&form_selector)
            .next()
            .expect("page should contain a campaign form");

        let input_selector = Selector::parse("input, textarea").unwrap();
        let input_names: Vec<_> = form
            .select(&input_selector)
            .filter_map(|input| input.value().attr("name"))
            .collect();
        for name in [
            "title",
            "short_description",
            "description",
            "image_url",
            "target_amount",
            "start_date",
            "end_date",
            "category",
            "location",
            "featured",
        ] {
            assert!(input_names.contains(&name), "missing input {name}");
        }
    }
}
