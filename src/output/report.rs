use crate::model::PokemonRecord;

fn json_for_script_tag(value: &str) -> String {
    value.replace("</", "<\\/")
}

// self-contained grid page: records are embedded as JSON and the search box,
// paging and cards are driven client-side
pub fn render_html(records: &[&PokemonRecord], items_per_page: usize) -> Vec<u8> {
    let json = serde_json::to_string(records).unwrap_or_else(|_| "[]".to_string());
    let json = json_for_script_tag(&json);
    let per_page = items_per_page.max(1);

    let html = format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>Pokemon Search</title>
  <style>
    body {{ font-family: sans-serif; margin: 2rem; background: #f8fafc; color: #0f172a; }}
    #search {{ padding: 0.5rem; width: 20rem; }}
    #grid {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(11rem, 1fr)); gap: 1rem; list-style: none; padding: 0; }}
    #grid li {{ background: #fff; border-radius: 0.5rem; padding: 1rem; box-shadow: 0 1px 3px rgba(0,0,0,0.1); text-align: center; }}
    #grid img {{ width: 96px; height: 96px; image-rendering: pixelated; }}
    .name {{ font-weight: 700; text-transform: capitalize; }}
    #pagination {{ margin-top: 1rem; display: flex; gap: 1rem; align-items: center; }}
  </style>
</head>
<body>
  <h1>Pokemon Search</h1>
  <input id="search" type="text" placeholder="Search by name or ID..."/>
  <ul id="grid"></ul>
  <div id="pagination">
    <button id="previous">Previous</button>
    <span id="page-label"></span>
    <button id="next">Next</button>
  </div>
  <script type="application/json" id="records-data">{json}</script>
  <script>
    (function() {{
      const perPage = {per_page};
      const records = JSON.parse(document.getElementById('records-data').textContent || '[]');
      const state = {{ term: '', page: 1 }};

      function escapeHtml(value) {{
        return String(value)
          .replace(/&/g, '&amp;')
          .replace(/</g, '&lt;')
          .replace(/>/g, '&gt;')
          .replace(/"/g, '&quot;');
      }}

      function filtered() {{
        if (!state.term) return records;
        return records.filter((r) => r.name.toLowerCase().includes(state.term) || String(r.id) === state.term);
      }}

      function render() {{
        const list = filtered();
        const totalPages = Math.ceil(list.length / perPage);
        const start = (state.page - 1) * perPage;
        const grid = document.getElementById('grid');
        grid.innerHTML = list.slice(start, start + perPage).map((r) => `
          <li>
            <span class="name">${{escapeHtml(r.name)}}</span>
            ${{r.image_url ? `<img src="${{escapeHtml(r.image_url)}}" alt="${{escapeHtml(r.name)}}"/>` : ''}}
            <p>CP: ${{r.combat_power}}</p>
            <p>Attack: ${{r.attack}}</p>
            <p>Defense: ${{r.defense}}</p>
            <p>Type: ${{escapeHtml(r.primary_type)}}</p>
          </li>`).join('');
        document.getElementById('page-label').textContent = `Page ${{state.page}} of ${{totalPages}}`;
        document.getElementById('previous').disabled = state.page <= 1;
        document.getElementById('next').disabled = state.page >= totalPages;
      }}

      document.getElementById('search').addEventListener('input', function(event) {{
        const term = event.target.value.trim().toLowerCase();
        if (term !== state.term) {{
          state.term = term;
          state.page = 1;
        }}
        render();
      }});
      document.getElementById('previous').addEventListener('click', function() {{
        if (state.page > 1) {{ state.page -= 1; render(); }}
      }});
      document.getElementById('next').addEventListener('click', function() {{
        if (state.page < Math.ceil(filtered().length / perPage)) {{ state.page += 1; render(); }}
      }});

      render();
    }})();
  </script>
</body>
</html>
"####
    );
    html.into_bytes()
}
