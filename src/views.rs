//! HTML pages served by the web handlers.

use crate::{
    types::{Playlist, PlaylistForm, TimeRange, User},
    utils::{escape_html, format_duration_ms},
};

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<nav><a href="/">Home</a> | <a href="/createPlaylists">Create playlist</a> | <a href="/playlists">Top playlist</a></nav>
{body}
</body>
</html>"#,
        title = escape_html(title),
        body = body
    )
}

pub fn home(user: &User) -> String {
    let name = user.display_name.as_deref().unwrap_or(&user.id);
    let mut body = format!("<h2>Hello {}</h2>\n<ul>\n", escape_html(name));

    body.push_str(&format!("<li>Id: {}</li>\n", escape_html(&user.id)));
    if let Some(email) = &user.email {
        body.push_str(&format!("<li>Email: {}</li>\n", escape_html(email)));
    }
    if let Some(country) = &user.country {
        body.push_str(&format!("<li>Country: {}</li>\n", escape_html(country)));
    }
    if let Some(product) = &user.product {
        body.push_str(&format!("<li>Plan: {}</li>\n", escape_html(product)));
    }
    body.push_str("</ul>\n");

    if let Some(image) = user.images.first() {
        body.push_str(&format!(
            "<img src=\"{}\" alt=\"profile picture\" width=\"120\">\n",
            escape_html(&image.url)
        ));
    }

    layout("sportop", &body)
}

pub fn playlist_form(user: &User, form: &PlaylistForm, errors: &[String]) -> String {
    let mut body = format!(
        "<h2>New playlist for {}</h2>\n",
        escape_html(user.display_name.as_deref().unwrap_or(&user.id))
    );

    if !errors.is_empty() {
        body.push_str("<ul class=\"errors\">\n");
        for error in errors {
            body.push_str(&format!("<li>{}</li>\n", escape_html(error)));
        }
        body.push_str("</ul>\n");
    }

    let options: String = TimeRange::ALL
        .iter()
        .map(|range| {
            let value = range.to_string();
            let selected = if form.range == value { " selected" } else { "" };
            format!(
                "<option value=\"{value}\"{selected}>{label}</option>",
                value = value,
                selected = selected,
                label = range.label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    body.push_str(&format!(
        r#"<form method="post" action="/createPlaylists">
<label>Name <input type="text" name="name" value="{name}" required></label>
<label>Tracks <input type="number" name="limit" min="1" max="50" value="{limit}" required></label>
<label>Range <select name="range">
{options}
</select></label>
<button type="submit">Create</button>
</form>
"#,
        name = escape_html(&form.name),
        limit = escape_html(&form.limit),
        options = options
    ));

    layout("Create playlist", &body)
}

pub fn playlist(playlist: &Playlist) -> String {
    let mut body = format!("<h2>{}</h2>\n", escape_html(&playlist.name));

    if let Some(description) = playlist.description.as_deref().filter(|d| !d.is_empty()) {
        body.push_str(&format!("<p>{}</p>\n", escape_html(description)));
    }
    if let Some(url) = &playlist.external_urls.spotify {
        body.push_str(&format!(
            "<p><a href=\"{}\">Open in Spotify</a></p>\n",
            escape_html(url)
        ));
    }

    body.push_str("<ol>\n");
    for track in playlist.tracks.items.iter().filter_map(|i| i.track.as_ref()) {
        let artists = track
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        body.push_str(&format!(
            "<li>{} - {} ({})</li>\n",
            escape_html(&track.name),
            escape_html(&artists),
            format_duration_ms(track.duration_ms)
        ));
    }
    body.push_str("</ol>\n");

    layout(&playlist.name, &body)
}
