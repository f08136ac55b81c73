//! Captured-shape HTML used by the offline tests.

/// Two ZATAZ items, the second without a heading link.
pub const ZATAZ_LISTING: &str = r#"
<html><body>
  <div class="blog-context-wrapper">
    <h2 class="blog-title"><a href="https://www.zataz.com/un-forum-pirate-saisi/">Un forum pirate saisi</a></h2>
    <div class="blog-content"><p>Les autorités ont saisi le forum.</p></div>
  </div>
  <div class="blog-context-wrapper">
    <h2 class="blog-title">Titre sans lien</h2>
    <div class="blog-content"><p>Un contenu sans titre.</p></div>
  </div>
</body></html>
"#;

/// OSINT page with three embeds and one iframe without `src`.
pub const ZATAZ_OSINT: &str = r#"
<html><body>
  <iframe class="wp-embedded-content" src="https://www.zataz.com/osint-premier/embed/"></iframe>
  <iframe class="wp-embedded-content"></iframe>
  <iframe class="wp-embedded-content" src="/osint-deuxieme/embed/"></iframe>
  <iframe class="wp-embedded-content" src="https://www.zataz.com/osint-troisieme/embed/"></iframe>
</body></html>
"#;

/// Embed rendition of the ZATAZ article `slug`.
pub fn zataz_embed(slug: &str, title: &str) -> String {
    format!(
        r#"<html><body>
  <div class="wp-embed post-1234 post type-post status-publish">
    <p class="wp-embed-heading"><a href="https://www.zataz.com/{slug}/embed/" target="_top">{title}</a></p>
    <div class="wp-embed-excerpt"><p>Extrait de {title}</p></div>
  </div>
</body></html>"#
    )
}

/// IT-Connect post listing with two complete posts and one lacking a link.
pub const ITCONNECT_POSTS: &str = r##"
<html><body>
  <article class="post type-post">
    <div class="cm-featured-image">
      <a href="https://www.it-connect.fr/patch-tuesday/"><img src="data:image/svg+xml,%3Csvg%3E" data-lazy-src="https://www.it-connect.fr/wp-content/uploads/patch.png" alt="Patch Tuesday"></a>
    </div>
    <div class="cm-post-categories"><a href="/actualites/">Actualités</a><a href="/securite/">Sécurité</a></div>
    <h2 class="cm-entry-title"><a href="https://www.it-connect.fr/patch-tuesday/">Patch Tuesday : 60 failles corrigées</a></h2>
    <span class="cm-post-date"><a href="#"><time datetime="2024-05-15">15 mai 2024</time></a></span>
    <span class="cm-author"><a href="/auteur/florian/">Florian Burnel</a></span>
    <span class="cm-comments-link"><a href="#comments">2 commentaires</a></span>
    <div class="cm-entry-summary"><p>Microsoft a publié ses mises à jour.</p></div>
    <span class="cm-tag-links"><a href="/tag/microsoft/">Microsoft</a><a href="/tag/windows/">Windows</a></span>
  </article>
  <article class="post type-post">
    <div class="cm-featured-image"><img src="https://www.it-connect.fr/wp-content/uploads/vpn.jpg" alt="VPN"></div>
    <h2 class="cm-entry-title"><a href="/vpn-faille/">Une faille dans un VPN</a></h2>
    <div class="cm-entry-summary"><p>Un correctif est disponible.</p></div>
    <span class="cm-tag-links"></span>
  </article>
  <article class="post type-post">
    <h2 class="cm-entry-title"><a>Article sans lien</a></h2>
    <div class="cm-entry-summary"><p>Ne doit pas apparaître.</p></div>
  </article>
</body></html>
"##;

/// IT-Connect course catalogue with one course missing its title block.
pub const ITCONNECT_COURSES: &str = r#"
<html><body>
  <article class="sfwd-courses type-sfwd-courses">
    <div class="cm-featured-image"><a href="/cours/linux/"><img data-lazy-src="/wp-content/uploads/linux.png" src="placeholder.gif" alt="Linux"></a></div>
    <h2 class="cm-entry-title"><a href="https://www.it-connect.fr/cours/linux/">Débuter avec Linux</a></h2>
    <div class="course-informations__steps-count"> 12 chapitres </div>
  </article>
  <article class="sfwd-courses type-sfwd-courses">
    <div class="course-informations__steps-count">4 chapitres</div>
  </article>
</body></html>
"#;
