pub mod panneau;
